//! JSON state storage in the output directory.
//!
//! Two files carry state between runs:
//! - metadata.json: last known channel set and when it was taken
//! - timeline.json: bounded ledger of change events
//!
//! A missing file means "first run". A file that exists but does not parse
//! is an error; history is never silently discarded.
//! Every write goes to a temp file in the output directory and is renamed
//! into place.

pub mod diff;
pub mod metadata;
pub mod timeline;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::{Result, SyncError};
use metadata::SyncMetadata;
use timeline::Timeline;

pub const METADATA_FILE: &str = "metadata.json";
pub const TIMELINE_FILE: &str = "timeline.json";
pub const CHANGES_FILE: &str = "changes.json";

/// Handle on the output directory. Open once per command.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Store { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub fn load_metadata(&self) -> Result<Option<SyncMetadata>> {
        read_json(&self.path(METADATA_FILE))
    }

    /// Load the ledger, empty when the file does not exist yet. Entries with
    /// inconsistent counts are rejected; a ledger longer than `max_entries`
    /// (written under a larger limit) is cut to its newest entries.
    pub fn load_timeline(&self, max_entries: usize) -> Result<Timeline> {
        let path = self.path(TIMELINE_FILE);
        let Some(mut timeline) = read_json::<Timeline>(&path)? else {
            return Ok(Timeline::new());
        };

        timeline
            .validate()
            .map_err(|reason| SyncError::CorruptTimeline {
                path: path.clone(),
                reason,
            })?;

        let evicted = timeline.truncate(max_entries);
        if evicted > 0 {
            tracing::info!(evicted, max_entries, "timeline exceeds configured limit, dropping oldest entries");
        }

        Ok(timeline)
    }

    pub fn load<T: DeserializeOwned>(&self, file_name: &str) -> Result<Option<T>> {
        read_json(&self.path(file_name))
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| SyncError::io(&self.dir, e))
    }

    /// Replace `file_name` with `contents` atomically.
    pub fn write(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.path(file_name);
        write_atomic(&self.dir, &path, contents)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
        Ok(path)
    }
}

/// Read and parse a JSON file. `Ok(None)` only when the file is absent.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SyncError::io(path, e)),
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| SyncError::parse(path, e))
}

fn write_atomic(dir: &Path, path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SyncError::io(dir, e))?;
    tmp.write_all(contents).map_err(|e| SyncError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| SyncError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| SyncError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_files_mean_first_run() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        assert!(store.load_metadata().unwrap().is_none());
        assert!(store.load_timeline(50).unwrap().is_empty());
    }

    #[test]
    fn malformed_metadata_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(METADATA_FILE), "{not json").unwrap();
        let store = Store::new(dir.path());

        match store.load_metadata() {
            Err(SyncError::Parse { path, .. }) => assert!(path.ends_with(METADATA_FILE)),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_timeline_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(TIMELINE_FILE), "[]").unwrap();
        let store = Store::new(dir.path());
        assert!(matches!(store.load_timeline(50), Err(SyncError::Parse { .. })));
    }

    #[test]
    fn inconsistent_timeline_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let raw = r#"{"entries": [{
            "timestamp": "2025-01-01T00:00:00Z",
            "total_count": 1,
            "added_count": 0,
            "removed_count": 3,
            "unchanged_count": 1,
            "added_channels": [],
            "removed_channels": []
        }]}"#;
        fs::write(dir.path().join(TIMELINE_FILE), raw).unwrap();
        let store = Store::new(dir.path());
        assert!(matches!(
            store.load_timeline(50),
            Err(SyncError::CorruptTimeline { .. })
        ));
    }

    #[test]
    fn oversized_timeline_is_cut_on_load() {
        let dir = TempDir::new().unwrap();
        let entry = |day: u32| {
            format!(
                r#"{{"timestamp": "2025-01-{day:02}T00:00:00Z", "total_count": 1,
                    "added_count": 0, "removed_count": 0, "unchanged_count": 1,
                    "added_channels": [], "removed_channels": []}}"#
            )
        };
        let raw = format!(r#"{{"entries": [{}, {}, {}]}}"#, entry(1), entry(2), entry(3));
        fs::write(dir.path().join(TIMELINE_FILE), raw).unwrap();

        let timeline = Store::new(dir.path()).load_timeline(2).unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(
            crate::util::format_timestamp(&timeline.entries()[0].timestamp()),
            "2025-01-02T00:00:00Z"
        );
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        store.write("a.txt", b"first").unwrap();
        let path = store.write("a.txt", b"second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");

        // no temp files left behind
        let names: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn write_into_missing_dir_fails_with_path() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("missing"));
        match store.write("a.txt", b"x") {
            Err(SyncError::Io { path, .. }) => assert!(path.ends_with("missing")),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
