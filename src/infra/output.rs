use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::{Result, TrackerError};
use crate::types::{OutputFormat, TrackingResult};

/// Where the encoded result goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// `None` and `"-"` mean stdout.
    pub fn from_arg(path: Option<&str>) -> Self {
        match path {
            None | Some("-") | Some("") => OutputTarget::Stdout,
            Some(p) => OutputTarget::File(PathBuf::from(p)),
        }
    }
}

/// Serialize the whole result into memory. JSON output ends with a newline.
pub fn encode(result: &TrackingResult, format: OutputFormat, pretty: bool) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Json => {
            let mut bytes = if pretty {
                serde_json::to_vec_pretty(result)?
            } else {
                serde_json::to_vec(result)?
            };
            bytes.push(b'\n');
            Ok(bytes)
        }
        OutputFormat::Binary => {
            let mut bytes = Vec::new();
            ciborium::into_writer(result, &mut bytes)?;
            Ok(bytes)
        }
    }
}

/// Write already-encoded bytes, creating or truncating the target file.
pub fn write_output(target: &OutputTarget, bytes: &[u8]) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            let mut out = io::stdout().lock();
            out.write_all(bytes).map_err(TrackerError::Output)?;
            out.flush().map_err(TrackerError::Output)
        }
        OutputTarget::File(path) => {
            let mut file = File::create(path).map_err(TrackerError::Output)?;
            file.write_all(bytes).map_err(TrackerError::Output)?;
            file.sync_all().map_err(TrackerError::Output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Carrier, TrackingUpdate};

    fn sample() -> TrackingResult {
        TrackingResult {
            tracking_number: "1Z999AA10123456784".to_string(),
            carrier: Carrier::Ups,
            delivered: false,
            delivery_timestamp: Some("2025-01-02T00:00:00Z".to_string()),
            updates: vec![TrackingUpdate {
                timestamp: "2024-12-30T09:15:00Z".to_string(),
                location: "Louisville, KY".to_string(),
                status: "Departed facility".to_string(),
            }],
        }
    }

    #[test]
    fn test_output_target_from_arg() {
        assert_eq!(OutputTarget::from_arg(None), OutputTarget::Stdout);
        assert_eq!(OutputTarget::from_arg(Some("-")), OutputTarget::Stdout);
        assert_eq!(
            OutputTarget::from_arg(Some("out.json")),
            OutputTarget::File(PathBuf::from("out.json"))
        );
    }

    #[test]
    fn test_compact_json_is_single_line() {
        let bytes = encode(&sample(), OutputFormat::Json, false).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with(r#"{"trackingNum":"1Z999AA10123456784","carrier":"UPS""#));
    }

    #[test]
    fn test_pretty_json_is_indented() {
        let bytes = encode(&sample(), OutputFormat::Json, true).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.lines().count() > 1);
        let parsed: TrackingResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_binary_decodes_to_same_result() {
        let mut result = sample();
        result.delivery_timestamp = None;
        let bytes = encode(&result, OutputFormat::Binary, false).unwrap();
        let decoded: TrackingResult = ciborium::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn test_write_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        std::fs::write(&path, "x".repeat(4096)).unwrap();

        let target = OutputTarget::File(path.clone());
        write_output(&target, b"{}\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = OutputTarget::File(dir.path().join("missing").join("result.json"));
        assert!(matches!(
            write_output(&target, b"{}\n"),
            Err(TrackerError::Output(_))
        ));
    }
}
