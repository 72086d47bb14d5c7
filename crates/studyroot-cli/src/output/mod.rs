//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use studyroot_core::{AskResponse, Config, HistoryEntry};

/// One configured subject as shown by `subjects`
#[derive(Debug, Serialize)]
pub struct SubjectRow {
    pub key: String,
    pub aliases: Vec<String>,
    pub path: PathBuf,
    pub exists: bool,
}

impl SubjectRow {
    pub fn from_config(config: &Config) -> Result<Vec<Self>> {
        config
            .subjects
            .iter()
            .map(|(key, subject)| {
                let path = config.subject_path(key)?;
                Ok(SubjectRow {
                    key: key.clone(),
                    aliases: subject.aliases.clone(),
                    exists: path.is_dir(),
                    path,
                })
            })
            .collect()
    }
}

/// Format an ask response
pub fn format_response(response: &AskResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_response(response),
        OutputFormat::Cli => terminal::format_response(response),
    }
}

/// Format history entries
pub fn format_history(entries: &[HistoryEntry], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_history(entries),
        OutputFormat::Cli => terminal::format_history(entries),
    }
}

/// Format configured subjects
pub fn format_subjects(subjects: &[SubjectRow], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_subjects(subjects),
        OutputFormat::Cli => terminal::format_subjects(subjects),
    }
}
