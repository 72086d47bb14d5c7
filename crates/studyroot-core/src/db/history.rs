//! Question/answer history storage
//!
//! The history table is append-only and also serves as the answer cache:
//! an exact (user, question) match is a cache hit.

use super::Database;
use crate::error::Result;
use chrono::{NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

/// A persisted question/answer pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub question: String,
    pub answer: String,
    pub subject: String,
    pub created_at: String,
}

impl HistoryEntry {
    /// Calendar date (UTC) the entry was created on
    pub fn date(&self) -> Option<NaiveDate> {
        chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    }
}

/// Row to insert into history
#[derive(Debug, Clone)]
pub struct NewHistoryEntry<'a> {
    pub user_id: i64,
    pub question: &'a str,
    pub answer: &'a str,
    pub subject: &'a str,
}

const HISTORY_COLUMNS: &str = "id, user_id, question, answer, subject, created_at";

impl Database {
    /// Most recent entry for an exact (user, question) pair.
    ///
    /// Duplicate rows can exist after concurrent cache misses; the newest one wins.
    pub fn find_history(&self, user_id: i64, question: &str) -> Result<Option<HistoryEntry>> {
        let sql = format!(
            "SELECT {} FROM history
             WHERE user_id = ?1 AND question = ?2
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
            HISTORY_COLUMNS
        );

        let entry = self
            .conn
            .query_row(&sql, params![user_id, question], row_to_entry)
            .optional()?;

        Ok(entry)
    }

    /// Append an entry, returning its id
    pub fn insert_history(&self, entry: &NewHistoryEntry<'_>) -> Result<i64> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        self.conn.execute(
            "INSERT INTO history (user_id, question, answer, subject, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![entry.user_id, entry.question, entry.answer, entry.subject, now],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// All entries for a user, newest first
    pub fn list_history(&self, user_id: i64) -> Result<Vec<HistoryEntry>> {
        let sql = format!(
            "SELECT {} FROM history
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
            HISTORY_COLUMNS
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Entries for a user on one calendar date, oldest first
    pub fn list_history_by_date(&self, user_id: i64, date: NaiveDate) -> Result<Vec<HistoryEntry>> {
        let sql = format!(
            "SELECT {} FROM history
             WHERE user_id = ?1 AND DATE(created_at) = ?2
             ORDER BY created_at ASC, id ASC",
            HISTORY_COLUMNS
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id, format_date(date)], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Delete a user's entries for one calendar date. Returns rows deleted.
    pub fn delete_history_by_date(&self, user_id: i64, date: NaiveDate) -> Result<usize> {
        let rows = self.conn.execute(
            "DELETE FROM history WHERE user_id = ?1 AND DATE(created_at) = ?2",
            params![user_id, format_date(date)],
        )?;
        Ok(rows)
    }

    /// Count entries for an exact (user, question) pair
    pub fn count_history(&self, user_id: i64, question: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM history WHERE user_id = ?1 AND question = ?2",
            params![user_id, question],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        question: row.get(2)?,
        answer: row.get(3)?,
        subject: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    fn entry<'a>(user_id: i64, question: &'a str, answer: &'a str) -> NewHistoryEntry<'a> {
        NewHistoryEntry {
            user_id,
            question,
            answer,
            subject: "Artificial Intelligence",
        }
    }

    fn insert_at(db: &Database, user_id: i64, question: &str, created_at: &str) {
        db.conn
            .execute(
                "INSERT INTO history (user_id, question, answer, subject, created_at)
                 VALUES (?1, ?2, 'answer', 'ai', ?3)",
                params![user_id, question, created_at],
            )
            .unwrap();
    }

    #[test]
    fn test_find_history_exact_match_only() {
        let db = setup();
        db.insert_history(&entry(1, "What is AI?", "AI is...")).unwrap();

        assert!(db.find_history(1, "What is AI?").unwrap().is_some());
        assert!(db.find_history(1, "what is ai?").unwrap().is_none());
        assert!(db.find_history(2, "What is AI?").unwrap().is_none());
    }

    #[test]
    fn test_find_history_most_recent_wins() {
        let db = setup();
        let first = db.insert_history(&entry(1, "q", "first")).unwrap();
        let second = db.insert_history(&entry(1, "q", "second")).unwrap();
        assert!(second > first);

        let found = db.find_history(1, "q").unwrap().unwrap();
        assert_eq!(found.id, second);
        assert_eq!(found.answer, "second");
        assert_eq!(db.count_history(1, "q").unwrap(), 2);
    }

    #[test]
    fn test_list_history_newest_first() {
        let db = setup();
        insert_at(&db, 1, "older", "2024-03-01T08:00:00.000Z");
        insert_at(&db, 1, "newer", "2024-03-02T08:00:00.000Z");
        insert_at(&db, 2, "other user", "2024-03-03T08:00:00.000Z");

        let rows = db.list_history(1).unwrap();
        let questions: Vec<_> = rows.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(questions, vec!["newer", "older"]);
    }

    #[test]
    fn test_list_and_delete_by_date() {
        let db = setup();
        insert_at(&db, 1, "late", "2024-03-01T20:00:00.000Z");
        insert_at(&db, 1, "early", "2024-03-01T08:00:00.000Z");
        insert_at(&db, 1, "next day", "2024-03-02T08:00:00.000Z");
        insert_at(&db, 2, "other user", "2024-03-01T09:00:00.000Z");

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let rows = db.list_history_by_date(1, date).unwrap();
        let questions: Vec<_> = rows.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(questions, vec!["early", "late"]);
        assert_eq!(rows[0].date(), Some(date));

        assert_eq!(db.delete_history_by_date(1, date).unwrap(), 2);
        assert!(db.list_history_by_date(1, date).unwrap().is_empty());
        assert_eq!(db.list_history(1).unwrap().len(), 1);
        assert_eq!(db.list_history(2).unwrap().len(), 1);
    }

    #[test]
    fn test_inserted_entry_is_dated_today() {
        let db = setup();
        db.insert_history(&entry(1, "q", "a")).unwrap();
        let found = db.find_history(1, "q").unwrap().unwrap();
        assert_eq!(found.date(), Some(Utc::now().date_naive()));
    }
}
