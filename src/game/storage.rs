use log::trace;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed, string-valued storage backend.
pub trait KeyValueStore {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    fn io_error(key: &str, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::io_error(key, err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| Self::io_error(key, e))?;
        let path = self.entry_path(key);
        trace!(target: "storage", "Writing {} bytes to {}", value.len(), path.display());
        fs::write(path, value).map_err(|e| Self::io_error(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::io_error(key, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("flippy-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("flippy-category").unwrap(), None);
        store.set("flippy-category", "\"fruits\"").unwrap();
        assert_eq!(
            store.get("flippy-category").unwrap().as_deref(),
            Some("\"fruits\"")
        );
        store.remove("flippy-category").unwrap();
        assert_eq!(store.get("flippy-category").unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_directory_and_round_trips() {
        let dir = scratch_dir();
        let mut store = FileStore::new(&dir);
        assert_eq!(store.get("flippy-scores").unwrap(), None);

        store.set("flippy-scores", "[]").unwrap();
        assert!(dir.join("flippy-scores.json").exists());
        assert_eq!(store.get("flippy-scores").unwrap().as_deref(), Some("[]"));

        store.remove("flippy-scores").unwrap();
        store.remove("flippy-scores").unwrap();
        assert_eq!(store.get("flippy-scores").unwrap(), None);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_store_reports_unwritable_directory() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        // a plain file where the data directory should be
        let blocker = dir.join("blocked");
        fs::write(&blocker, "x").unwrap();

        let mut store = FileStore::new(&blocker);
        let err = store.set("flippy-history", "[]").unwrap_err();
        assert!(matches!(err, PersistenceError::Io { ref key, .. } if key == "flippy-history"));

        let _ = fs::remove_dir_all(dir);
    }
}
