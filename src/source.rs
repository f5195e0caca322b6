//! Message history sources
//!
//! Fetching a channel's history is the chat client's job. The exporter only
//! needs a fully materialized `MessageBatch`; `MessageSource` is that seam.
//! `SnapshotSource` reads a batch previously dumped to a JSON file (an array
//! of message objects).

use std::path::PathBuf;

use thiserror::Error;

use crate::threading::MessageBatch;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read message snapshot {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("message snapshot {} is malformed: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("history fetch failed: {0}")]
    Fetch(String),
}

/// Something that can hand over a channel's complete history
pub trait MessageSource {
    fn fetch_history(&self, guild_id: &str, channel_id: &str) -> Result<MessageBatch, SourceError>;
}

/// History read from a JSON snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotSource { path: path.into() }
    }
}

impl MessageSource for SnapshotSource {
    fn fetch_history(&self, guild_id: &str, channel_id: &str) -> Result<MessageBatch, SourceError> {
        let data = std::fs::read(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;

        let batch: MessageBatch = serde_json::from_slice(&data).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })?;

        log::info!(
            "loaded {} messages for guild {} channel {} from {}",
            batch.len(),
            guild_id,
            channel_id,
            self.path.display()
        );

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_source_reads_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"[{"id": "1", "author_id": "7", "author_name": "bob",
                 "created_at": "2024-05-01T10:00:00Z", "content": "hello"}]"#,
        )
        .unwrap();

        let batch = SnapshotSource::new(&path).fetch_history("g", "c").unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.iter().next().unwrap().author_name, "bob");
    }

    #[test]
    fn test_missing_snapshot_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = SnapshotSource::new(dir.path().join("absent.json"));

        assert!(matches!(
            source.fetch_history("g", "c"),
            Err(SourceError::Read { .. })
        ));
    }

    #[test]
    fn test_malformed_snapshot_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();

        assert!(matches!(
            SnapshotSource::new(&path).fetch_history("g", "c"),
            Err(SourceError::Parse { .. })
        ));
    }
}
