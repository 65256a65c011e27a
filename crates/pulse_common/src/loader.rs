//! Telemetry loader.
//!
//! Telemetry comes from a static JSON dataset. The file is looked up in a
//! fixed list of candidate locations and the first one that exists wins.
//! Nothing is cached: every `load` re-reads the file.

use crate::error::PulseError;
use crate::types::TelemetryRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Candidate dataset locations, highest priority first
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "q-vercel-latency.json",
    "../q-vercel-latency.json",
    "/var/task/q-vercel-latency.json",
];

/// Source of telemetry records.
///
/// An empty `Vec` means "no data". Whether that is an error is up to the
/// caller.
pub trait TelemetrySource: Send + Sync {
    fn load(&self) -> Result<Vec<TelemetryRecord>, PulseError>;

    /// Human-readable description for logs and the health endpoint
    fn describe(&self) -> String;

    /// Whether a `load` right now would find any data
    fn is_available(&self) -> bool {
        self.load().map(|records| !records.is_empty()).unwrap_or(false)
    }
}

/// Reads a JSON array of records from the first existing candidate path
#[derive(Debug, Clone)]
pub struct FileTelemetrySource {
    candidates: Vec<PathBuf>,
}

impl FileTelemetrySource {
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First candidate that exists on disk
    pub fn resolve(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .find(|path| path.exists())
            .map(PathBuf::as_path)
    }

    fn read_records(path: &Path) -> Result<Vec<TelemetryRecord>, PulseError> {
        let content = fs::read_to_string(path).map_err(|source| PulseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|e| PulseError::MalformedInput {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl Default for FileTelemetrySource {
    fn default() -> Self {
        Self::new(DEFAULT_CANDIDATES.iter().copied())
    }
}

impl TelemetrySource for FileTelemetrySource {
    fn load(&self) -> Result<Vec<TelemetryRecord>, PulseError> {
        let Some(path) = self.resolve() else {
            warn!(
                "No telemetry dataset found (checked {} locations)",
                self.candidates.len()
            );
            return Ok(Vec::new());
        };

        let records = Self::read_records(path)?;
        debug!("Loaded {} telemetry records from {}", records.len(), path.display());
        Ok(records)
    }

    fn describe(&self) -> String {
        match self.resolve() {
            Some(path) => format!("file:{}", path.display()),
            None => "file:<missing>".to_string(),
        }
    }

    fn is_available(&self) -> bool {
        self.resolve().is_some()
    }
}

/// In-memory record set
#[derive(Debug, Clone, Default)]
pub struct StaticTelemetrySource {
    records: Vec<TelemetryRecord>,
}

impl StaticTelemetrySource {
    pub fn new(records: Vec<TelemetryRecord>) -> Self {
        Self { records }
    }
}

impl TelemetrySource for StaticTelemetrySource {
    fn load(&self) -> Result<Vec<TelemetryRecord>, PulseError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static:{} records", self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_dataset(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_everywhere_returns_empty() {
        let dir = TempDir::new().unwrap();
        let source = FileTelemetrySource::new([dir.path().join("a.json"), dir.path().join("b.json")]);
        assert!(source.load().unwrap().is_empty());
        assert!(source.resolve().is_none());
        assert_eq!(source.describe(), "file:<missing>");
        assert!(!source.is_available());
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = TempDir::new().unwrap();
        let second = write_dataset(
            &dir,
            "second.json",
            r#"[{"region": "emea", "latency_ms": 120, "uptime_pct": 99.2}]"#,
        );
        let third = write_dataset(
            &dir,
            "third.json",
            r#"[{"region": "apac", "latency_ms": 200, "uptime_pct": 97.0}]"#,
        );
        let source = FileTelemetrySource::new([dir.path().join("first.json"), second.clone(), third]);

        assert_eq!(source.resolve(), Some(second.as_path()));
        let records = source.load().unwrap();
        assert_eq!(records, vec![TelemetryRecord::new("emea", 120.0, 99.2)]);
    }

    #[test]
    fn test_malformed_json_propagates() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, "broken.json", r#"[{"region": "emea", "#);
        let source = FileTelemetrySource::new([path]);
        match source.load() {
            Err(PulseError::MalformedInput { message, .. }) => assert!(!message.is_empty()),
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_candidate_is_io_error() {
        let dir = TempDir::new().unwrap();
        let subdir = dir.path().join("q-vercel-latency.json");
        fs::create_dir(&subdir).unwrap();
        let source = FileTelemetrySource::new([subdir.clone()]);

        assert_eq!(source.resolve(), Some(subdir.as_path()));
        match source.load() {
            Err(err @ PulseError::Io { .. }) => {
                assert_eq!(err.kind(), "io");
                assert!(err.to_string().starts_with("failed to read telemetry data from"));
            }
            other => panic!("expected Io, got {:?}", other),
        }
    }

    #[test]
    fn test_non_array_document_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, "object.json", r#"{"region": "emea"}"#);
        let source = FileTelemetrySource::new([path]);
        assert!(matches!(source.load(), Err(PulseError::MalformedInput { .. })));
    }

    #[test]
    fn test_empty_array_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, "empty.json", "[]");
        let source = FileTelemetrySource::new([path]);
        assert!(source.load().unwrap().is_empty());
    }

    #[test]
    fn test_rereads_on_every_load() {
        let dir = TempDir::new().unwrap();
        let path = write_dataset(&dir, "data.json", "[]");
        let source = FileTelemetrySource::new([path.clone()]);
        assert!(source.load().unwrap().is_empty());

        fs::write(&path, r#"[{"region": "amer", "latency_ms": 90, "uptime_pct": 99.9}]"#).unwrap();
        assert_eq!(source.load().unwrap().len(), 1);
    }

    #[test]
    fn test_default_candidates() {
        let source = FileTelemetrySource::default();
        assert_eq!(source.candidates().len(), DEFAULT_CANDIDATES.len());
        assert_eq!(source.candidates()[0], PathBuf::from("q-vercel-latency.json"));
    }

    #[test]
    fn test_static_source() {
        let source = StaticTelemetrySource::new(vec![TelemetryRecord::new("emea", 1.0, 2.0)]);
        assert_eq!(source.load().unwrap().len(), 1);
        assert_eq!(source.describe(), "static:1 records");
        assert!(source.is_available());
        assert!(!StaticTelemetrySource::default().is_available());
    }
}
