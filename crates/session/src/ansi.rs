use std::sync::LazyLock;

use regex::Regex;

/// CSI sequences: `ESC [` followed by parameter/intermediate bytes and a final
/// letter. Covers both `\[NN;NNX` (e.g. cursor position) and `\[?NNX` (e.g.
/// DEC private mode) forms.
static CSI_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;?]*[A-Za-z]").unwrap());

/// Any ESC byte left over (bare ESC, or non-CSI escapes such as charset
/// selection) is dropped outright.
static LONE_ESCAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x1B").unwrap());

/// Strip ANSI/VT100 escape sequences from device output. Idempotent:
/// `strip_ansi(&strip_ansi(s)) == strip_ansi(s)`, since no ESC bytes survive
/// a single pass.
pub fn strip_ansi(input: &str) -> String {
    let without_csi = CSI_SEQUENCE.replace_all(input, "");
    LONE_ESCAPE.replace_all(&without_csi, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_cursor_and_color_sequences() {
        let raw = "\x1B[2J\x1B[1;1HHP ProCurve\x1B[0m Switch";
        assert_eq!(strip_ansi(raw), "HP ProCurve Switch");
    }

    #[test]
    fn strips_dec_private_mode_sequences() {
        let raw = "\x1B[?25l--More--\x1B[?25h";
        assert_eq!(strip_ansi(raw), "--More--");
    }

    #[test]
    fn strips_bare_escape_bytes() {
        let raw = "before\x1B(Bafter";
        assert_eq!(strip_ansi(raw), "beforeBafter");
    }

    #[test]
    fn is_idempotent() {
        let raw = "\x1B[2J\x1B[31mred\x1B[0m plain\x1B";
        let once = strip_ansi(raw);
        let twice = strip_ansi(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn leaves_plain_text_untouched() {
        let raw = "no escapes here";
        assert_eq!(strip_ansi(raw), raw);
    }
}
