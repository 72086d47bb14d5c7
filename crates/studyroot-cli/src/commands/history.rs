//! History command

use crate::app::{HistoryAction, HistoryArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use studyroot_core::{HistoryStore, SqliteHistoryStore};

pub async fn run(args: HistoryArgs, store: &SqliteHistoryStore, format: OutputFormat) -> Result<()> {
    match args.action {
        HistoryAction::List { user } => {
            let entries = store.select_by_user(user)?;
            print!("{}", output::format_history(&entries, format));
        }
        HistoryAction::Show { user, date } => {
            let entries = store.select_by_user_and_date(user, date)?;
            print!("{}", output::format_history(&entries, format));
        }
        HistoryAction::Delete { user, date } => {
            let deleted = store.delete_by_user_and_date(user, date)?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "deleted": deleted }));
                }
                OutputFormat::Cli => {
                    println!("Deleted {} entries from {}", deleted, date);
                }
            }
        }
    }
    Ok(())
}
