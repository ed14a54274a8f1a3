use quire_editor::{Block, PersistenceSink, SyncError};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Persists a document as pretty JSON in a single file.
///
/// The store remembers what the file held when it was opened or last
/// written. If someone else changed it in the meantime the write is
/// refused with a conflict and the file is left alone.
pub struct FileStore {
    path: PathBuf,
    known: Option<String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let known = if path.exists() {
            Some(fs::read_to_string(&path)?)
        } else {
            None
        };
        Ok(Self { path, known })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl PersistenceSink for FileStore {
    fn persist(&mut self, document_id: &str, roots: &[Block], timestamp: u64) -> Result<(), SyncError> {
        let on_disk = if self.path.exists() {
            Some(fs::read_to_string(&self.path).map_err(|e| SyncError::Backend(e.to_string()))?)
        } else {
            None
        };
        if on_disk != self.known {
            return Err(SyncError::Conflict(format!(
                "{} changed on disk since it was loaded",
                self.path.display()
            )));
        }

        let json = serde_json::to_string_pretty(roots).map_err(|e| SyncError::Backend(e.to_string()))?;
        fs::write(&self.path, &json).map_err(|e| SyncError::Backend(e.to_string()))?;
        debug!(document = document_id, path = %self.path.display(), timestamp, "Wrote document");

        self.known = Some(json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_and_tracks_own_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let mut store = FileStore::open(&path).unwrap();

        store.persist("doc", &[Block::text("one").with_id("a")], 1).unwrap();
        store
            .persist("doc", &[Block::text("two").with_id("a")], 2)
            .unwrap();

        let saved: Vec<Block> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved[0].content, "two");
    }

    #[test]
    fn test_foreign_edit_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "[]").unwrap();

        let mut store = FileStore::open(&path).unwrap();
        fs::write(&path, r#"[{"id":"x","type":"text"}]"#).unwrap();

        let result = store.persist("doc", &[Block::text("mine")], 1);
        assert!(matches!(result, Err(SyncError::Conflict(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"[{"id":"x","type":"text"}]"#);
    }
}
