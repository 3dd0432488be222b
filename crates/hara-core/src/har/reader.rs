use super::types::{Entry, Har, Log, Page};
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<Har> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a HAR document from a JSON string
    ///
    /// Invalid JSON and a missing `log.pages` / `log.entries` array are
    /// reported as [`Error::MalformedInput`]; a page or entry lacking the
    /// fields the summariser needs is reported as [`Error::UnexpectedShape`].
    pub fn from_str(content: &str) -> Result<Har> {
        tracing::debug!("Parsing HAR from string ({} bytes)", content.len());

        let document: Value =
            serde_json::from_str(content).map_err(|e| Error::MalformedInput(e.to_string()))?;

        let log = document
            .get("log")
            .ok_or_else(|| Error::MalformedInput("missing `log` object".to_string()))?;
        let pages = Self::array(log, "pages")?;
        let entries = Self::array(log, "entries")?;

        let pages = pages
            .iter()
            .enumerate()
            .map(|(idx, page)| {
                Page::deserialize(page)
                    .map_err(|e| Error::UnexpectedShape(format!("page {}: {}", idx, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let entries = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                Entry::deserialize(entry)
                    .map_err(|e| Error::UnexpectedShape(format!("entry {}: {}", idx, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Parsed HAR with {} pages and {} entries",
            pages.len(),
            entries.len()
        );

        Ok(Har {
            log: Log { pages, entries },
        })
    }

    fn array<'a>(log: &'a Value, field: &str) -> Result<&'a Vec<Value>> {
        log.get(field)
            .and_then(Value::as_array)
            .ok_or_else(|| Error::MalformedInput(format!("missing `log.{}` array", field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_har() {
        let har_json = r#"{
            "log": {
                "version": "1.2",
                "creator": {"name": "test", "version": "1.0"},
                "pages": [],
                "entries": []
            }
        }"#;

        let har = HarReader::from_str(har_json).unwrap();
        assert!(har.log.pages.is_empty());
        assert!(har.log.entries.is_empty());
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let result = HarReader::from_str("{\"log\": ");
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_missing_entries_is_malformed() {
        let result = HarReader::from_str(r#"{"log": {"pages": []}}"#);
        match result {
            Err(Error::MalformedInput(msg)) => assert!(msg.contains("log.entries")),
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_log_is_malformed() {
        let result = HarReader::from_str(r#"{"pages": [], "entries": []}"#);
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_entry_without_url_is_unexpected_shape() {
        let har_json = r#"{
            "log": {
                "pages": [],
                "entries": [{
                    "time": 1,
                    "request": {},
                    "response": {"content": {"size": 0}},
                    "timings": {"wait": 1, "receive": 1}
                }]
            }
        }"#;

        match HarReader::from_str(har_json) {
            Err(Error::UnexpectedShape(msg)) => {
                assert!(msg.starts_with("entry 0"));
                assert!(msg.contains("url"));
            }
            other => panic!("expected UnexpectedShape, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file_missing_path_is_io_error() {
        let result = HarReader::from_file(Path::new("/nonexistent/capture.har"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
