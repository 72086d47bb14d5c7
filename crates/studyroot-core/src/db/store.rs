//! History store used by the answering pipeline

use super::{Database, HistoryEntry, NewHistoryEntry};
use crate::error::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Durable store of answered questions
pub trait HistoryStore: Send + Sync {
    /// Most recent entry for an exact (user, question) pair
    fn find_one(&self, user_id: i64, question: &str) -> Result<Option<HistoryEntry>>;

    /// Append an entry, returning its id
    fn insert(&self, entry: &NewHistoryEntry<'_>) -> Result<i64>;

    /// All entries for a user, newest first
    fn select_by_user(&self, user_id: i64) -> Result<Vec<HistoryEntry>>;

    /// Entries for a user on one date, oldest first
    fn select_by_user_and_date(&self, user_id: i64, date: NaiveDate) -> Result<Vec<HistoryEntry>>;

    /// Delete a user's entries for one date
    fn delete_by_user_and_date(&self, user_id: i64, date: NaiveDate) -> Result<usize>;
}

/// SQLite-backed history store.
///
/// Every operation opens its own connection and drops it before returning,
/// so nothing is held between requests.
#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    path: PathBuf,
}

impl SqliteHistoryStore {
    /// Open the store, creating and migrating the schema if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Database::open(&path)?;
        db.initialize()?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Database> {
        Database::open(&self.path)
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn find_one(&self, user_id: i64, question: &str) -> Result<Option<HistoryEntry>> {
        self.connect()?.find_history(user_id, question)
    }

    fn insert(&self, entry: &NewHistoryEntry<'_>) -> Result<i64> {
        self.connect()?.insert_history(entry)
    }

    fn select_by_user(&self, user_id: i64) -> Result<Vec<HistoryEntry>> {
        self.connect()?.list_history(user_id)
    }

    fn select_by_user_and_date(&self, user_id: i64, date: NaiveDate) -> Result<Vec<HistoryEntry>> {
        self.connect()?.list_history_by_date(user_id, date)
    }

    fn delete_by_user_and_date(&self, user_id: i64, date: NaiveDate) -> Result<usize> {
        self.connect()?.delete_history_by_date(user_id, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_store_roundtrip_across_connections() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = SqliteHistoryStore::open(temp.path().join("history.sqlite")).unwrap();

        let id = store
            .insert(&NewHistoryEntry {
                user_id: 7,
                question: "Define entropy",
                answer: "Entropy measures uncertainty.",
                subject: "Machine Learning",
            })
            .unwrap();

        let found = store.find_one(7, "Define entropy").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.subject, "Machine Learning");

        let today = Utc::now().date_naive();
        assert_eq!(store.select_by_user(7).unwrap().len(), 1);
        assert_eq!(store.select_by_user_and_date(7, today).unwrap().len(), 1);
        assert_eq!(store.delete_by_user_and_date(7, today).unwrap(), 1);
        assert!(store.find_one(7, "Define entropy").unwrap().is_none());
    }
}
