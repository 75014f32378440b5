/// Slice `s` by a byte range, clamped to the string's length and to the
/// nearest char boundary, instead of panicking on short or truncated lines.
/// Vendor CLI output is fixed-width only in the nominal case; a narrower
/// terminal or a wrapped line must not crash the parser.
pub fn col(s: &str, start: usize, end: Option<usize>) -> &str {
    let len = s.len();
    let start = start.min(len);
    let end = end.map(|e| e.min(len)).unwrap_or(len);
    if start >= end {
        return "";
    }
    let start = floor_char_boundary(s, start);
    let end = floor_char_boundary(s, end);
    if start >= end { "" } else { &s[start..end] }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Rewrite `aa:bb:cc:dd:ee:ff`-style separators to spaces, matching the
/// explored-set's MAC key convention.
pub fn normalize_mac(s: &str) -> String {
    s.replace(':', " ").trim().to_string()
}

/// Split `text` into blocks wherever a line contains `marker`; the marker
/// line itself is dropped and starts a new block. Used to separate repeated
/// neighbor records in detail output.
pub fn split_on_marker_lines(text: &str, marker: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.contains(marker) {
            if !current.trim().is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        blocks.push(current);
    }
    blocks
}
