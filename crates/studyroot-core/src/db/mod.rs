//! Database layer for studyroot
//!
//! Provides SQLite-based storage for answered questions, which double as
//! the answer cache.

mod history;
mod schema;
mod store;

pub use history::{HistoryEntry, NewHistoryEntry};
pub use schema::Database;
pub use store::{HistoryStore, SqliteHistoryStore};
use std::path::PathBuf;

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::DATA_DIR_NAME)
            .join("history.sqlite")
    }
}
