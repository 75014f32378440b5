use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::model::Device;

/// A failure writing the final topology file. Always fatal: the caller
/// reports it on exit even though individual host failures during the crawl
/// are not.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to serialize explored devices: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write temporary output file {path}: {source}")]
    WriteTemp {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move temporary output into place at {path}: {source}")]
    Rename {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Serialize `devices` to a JSON array and write it to `output_path`
/// atomically: the document is written to a sibling temp file first, then
/// renamed into place, so a reader never observes a partially written file.
pub fn write_devices(devices: &[Device], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    let json = serde_json::to_vec_pretty(devices)?;

    let dir = output_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "networkmap-output".to_string());
    let temp_path = dir.join(format!(".{file_name}.tmp"));

    fs::write(&temp_path, &json).map_err(|source| OutputError::WriteTemp {
        path: temp_path.display().to_string(),
        source,
    })?;

    fs::rename(&temp_path, output_path).map_err(|source| OutputError::Rename {
        path: output_path.display().to_string(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeviceStatus;
    use tempfile::TempDir;

    fn stub_device(name: &str) -> Device {
        Device::stub(name).with_status(DeviceStatus::Unreachable)
    }

    #[test]
    fn writes_devices_as_a_json_array() {
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("topology.json");

        let devices = vec![stub_device("sw1"), stub_device("sw2")];
        write_devices(&devices, &output_path).unwrap();

        let contents = fs::read_to_string(&output_path).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.len(), 2);

        let leftover_temp = dir.path().join(".topology.json.tmp");
        assert!(!leftover_temp.exists());
    }

    #[test]
    fn overwrites_an_existing_output_file() {
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("topology.json");
        fs::write(&output_path, b"stale").unwrap();

        write_devices(&[stub_device("sw1")], &output_path).unwrap();

        let contents = fs::read_to_string(&output_path).unwrap();
        assert!(contents.contains("sw1"));
    }
}
