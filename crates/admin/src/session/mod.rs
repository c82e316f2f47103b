//! Persisted session storage.
//!
//! The login page writes the user's record under [`SESSION_KEY`] in a small
//! key-value store that survives restarts; the route gate reads it back.
//! The store is always injected, never reached as global state.

mod file;

pub use file::FileSessionStore;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use codeburger_core::{SESSION_KEY, SessionRecord};
use thiserror::Error;

/// Errors raised by a session store backend.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Reading or writing the backing file failed.
    #[error("Session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("Session store is corrupt: {0}")]
    Corrupt(String),

    /// A record could not be encoded.
    #[error("Session record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// A previous writer panicked while holding the store.
    #[error("Session store lock poisoned")]
    Poisoned,
}

/// String key-value store that persists across page loads.
pub trait SessionStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), SessionStoreError>;
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        (**self).remove(key)
    }
}

/// Read the current session record.
///
/// Unreadable or malformed data is logged and treated as no session, so
/// callers always fail closed.
pub fn load_session<S: SessionStore + ?Sized>(store: &S) -> Option<SessionRecord> {
    let raw = match store.get(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Session store unreadable, treating as logged out");
            return None;
        }
    };

    match SessionRecord::from_stored(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(error = %e, "Stored session is malformed, treating as logged out");
            None
        }
    }
}

/// Persist `record` as the current session (login).
///
/// # Errors
///
/// Returns an error if the record cannot be encoded or stored.
pub fn save_session<S: SessionStore + ?Sized>(
    store: &S,
    record: &SessionRecord,
) -> Result<(), SessionStoreError> {
    let encoded = record.to_stored()?;
    store.set(SESSION_KEY, &encoded)
}

/// Remove the current session (logout).
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn clear_session<S: SessionStore + ?Sized>(store: &S) -> Result<(), SessionStoreError> {
    store.remove(SESSION_KEY)
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        let entries = self.entries.lock().map_err(|_| SessionStoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.lock().map_err(|_| SessionStoreError::Poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        let mut entries = self.entries.lock().map_err(|_| SessionStoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, SessionStoreError> {
            Err(SessionStoreError::Corrupt("truncated".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), SessionStoreError> {
            Err(SessionStoreError::Poisoned)
        }

        fn remove(&self, _key: &str) -> Result<(), SessionStoreError> {
            Err(SessionStoreError::Poisoned)
        }
    }

    #[test]
    fn test_save_load_clear() {
        let store = MemorySessionStore::new();
        assert!(load_session(&store).is_none());

        let record = SessionRecord::new("ana@example.com", true).with_token("t0k3n");
        save_session(&store, &record).unwrap();
        assert_eq!(load_session(&store), Some(record));

        clear_session(&store).unwrap();
        assert!(load_session(&store).is_none());
    }

    #[test]
    fn test_malformed_record_is_no_session() {
        let store = MemorySessionStore::new();
        store.set(SESSION_KEY, "{not json").unwrap();
        assert!(load_session(&store).is_none());

        store.set(SESSION_KEY, "\"just a string\"").unwrap();
        assert!(load_session(&store).is_none());
    }

    #[test]
    fn test_unreadable_store_is_no_session() {
        assert!(load_session(&BrokenStore).is_none());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = MemorySessionStore::new();
        assert!(store.remove("missing").is_ok());
    }
}
