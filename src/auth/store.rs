//! Durable persistence for the session record.
//!
//! The record survives restarts and is written and cleared as a unit: one
//! JSON file holding the token, user id and email. A file that is missing
//! any of the three fields reads as absent and is deleted, so a corrupted
//! half-session can never be observed by callers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use super::session::Session;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

pub struct SessionStore {
    data_dir: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Store the full record as a single write
    pub fn put(&self, session: &Session) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(path, contents).context("Failed to write session file")?;
        Ok(())
    }

    /// Read the record, or `None` when it is missing or incomplete.
    /// An unparsable or partial file is removed before returning.
    pub fn get(&self) -> Option<Session> {
        let path = self.session_path();
        if !path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "Failed to read session file");
                return None;
            }
        };

        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "Discarding corrupt session record");
                if let Err(e) = self.clear() {
                    warn!(error = %e, "Failed to remove corrupt session file");
                }
                None
            }
        }
    }

    /// Remove the record. Idempotent.
    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        Session {
            token: "T1".to_string(),
            user_id: "42".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn test_put_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());

        store.put(&sample_session()).unwrap();
        let loaded = store.get().expect("record present");
        assert_eq!(loaded, sample_session());
    }

    #[test]
    fn test_get_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        assert!(store.get().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());

        store.put(&sample_session()).unwrap();
        store.clear().unwrap();
        assert!(store.get().is_none());
        // Clearing an already-empty store succeeds
        store.clear().unwrap();
    }

    #[test]
    fn test_partial_record_reads_as_absent_and_self_heals() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());

        // Two of the three required fields
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"token": "T1", "email": "a@x.com"}"#).unwrap();

        assert!(store.get().is_none());
        assert!(!path.exists(), "corrupt record should be removed");
    }

    #[test]
    fn test_garbage_record_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());

        std::fs::write(dir.path().join("session.json"), "not json").unwrap();
        assert!(store.get().is_none());
    }
}
