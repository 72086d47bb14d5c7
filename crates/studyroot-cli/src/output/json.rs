//! JSON output formatter

use super::SubjectRow;
use studyroot_core::{AskResponse, HistoryEntry};

pub fn format_response(response: &AskResponse) -> String {
    serde_json::to_string_pretty(response).unwrap_or_else(|_| "{}".to_string()) + "\n"
}

pub fn format_history(entries: &[HistoryEntry]) -> String {
    serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string()) + "\n"
}

pub fn format_subjects(subjects: &[SubjectRow]) -> String {
    serde_json::to_string_pretty(subjects).unwrap_or_else(|_| "[]".to_string()) + "\n"
}
