//! File-backed session store.
//!
//! Entries live in a single JSON object (`{"key": "value", ...}`). Writes go
//! to a sibling temp file first and are renamed into place.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{SessionStore, SessionStoreError};

type Entries = BTreeMap<String, String>;

/// Session store persisted to a JSON file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, SessionStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&contents).map_err(|e| SessionStoreError::Corrupt(e.to_string()))
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Read entries for a write. A corrupt file is discarded rather than
    /// blocking login or logout forever.
    fn entries_for_update(&self) -> Result<Entries, SessionStoreError> {
        match self.read_entries() {
            Err(SessionStoreError::Corrupt(reason)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %reason,
                    "Discarding corrupt session file"
                );
                Ok(Entries::new())
            }
            other => other,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let _guard = self.write_lock.lock().map_err(|_| SessionStoreError::Poisoned)?;
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        let _guard = self.write_lock.lock().map_err(|_| SessionStoreError::Poisoned)?;
        let mut entries = self.entries_for_update()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("nested").join("session.json")
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(session_path(&dir));
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_set_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_path(&dir);
        let store = FileSessionStore::new(&path);
        store.set("user", "ana").unwrap();
        store.set("theme", "dark").unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.get("user").unwrap().as_deref(), Some("ana"));
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));

        reopened.remove("user").unwrap();
        assert_eq!(store.get("user").unwrap(), None);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_file_errors_on_read_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_path(&dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.get("user"), Err(SessionStoreError::Corrupt(_))));

        store.set("user", "ana").unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some("ana"));
    }
}
