pub mod cursor;
pub mod memory;
pub mod sqlite;

pub use cursor::{CursorOptions, DEFAULT_HISTORY_LIMIT, UnknownCursorPolicy};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::common::{Message, MessagePage};
use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cursor {0} does not match any stored message")]
    UnknownCursor(String),
    #[error("message store lock poisoned")]
    Poisoned,
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only message log, queried with the cursor protocol in [`cursor`].
///
/// Implementations serialise `append` and `list_since` internally, so a
/// shared `Arc<dyn MessageStore>` can be used from concurrent request handlers.
pub trait MessageStore: Send + Sync {
    /// Stores a new message with a fresh id and the current time.
    fn append(&self, username: &str, text: &str) -> Result<Message, StoreError>;

    /// Messages newer than `cursor`, plus the cursor to use next time.
    fn list_since(&self, cursor: Option<&str>) -> Result<MessagePage, StoreError>;

    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

pub(crate) fn new_message(username: &str, text: &str) -> Message {
    Message {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        text: text.to_string(),
        timestamp: Utc::now().timestamp_millis(),
    }
}

/// Opens the backend selected in the config.
pub fn open_store(
    storage: &StorageConfig,
    options: CursorOptions,
) -> Result<Arc<dyn MessageStore>, StoreError> {
    match storage {
        StorageConfig::Memory => Ok(Arc::new(MemoryStore::with_options(options))),
        StorageConfig::Sqlite { path } => {
            ensure_parent_dir(path)?;
            Ok(Arc::new(SqliteStore::open(path, options)?))
        }
    }
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_store_creates_sqlite_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/messages.db");

        let store = open_store(&StorageConfig::Sqlite { path: path.clone() }, CursorOptions::default())
            .unwrap();
        store.append("alice", "hi").unwrap();

        assert!(path.exists());
        assert!(!store.is_empty().unwrap());
    }

    #[test]
    fn open_store_defaults_to_memory() {
        let store = open_store(&StorageConfig::Memory, CursorOptions::default()).unwrap();
        assert!(store.is_empty().unwrap());
    }
}
