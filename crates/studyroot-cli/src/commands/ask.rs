//! Ask command

use crate::app::{AskArgs, OutputFormat};
use crate::output;
use anyhow::Result;
use std::sync::Arc;
use studyroot_core::{AnswerPipeline, Config, Question, SqliteHistoryStore, StudyRootError};

pub async fn run(
    args: AskArgs,
    config: Config,
    store: SqliteHistoryStore,
    format: OutputFormat,
) -> Result<()> {
    let text = args.question_text();
    if text.trim().is_empty() {
        return Err(StudyRootError::InvalidInput("Question must not be empty".to_string()).into());
    }

    let question = Question::new(text, args.user, args.subject).with_deep_explanation(args.deep);
    let pipeline = AnswerPipeline::from_config(config, Arc::new(store))?;

    let response = pipeline.ask(&question).await;
    print!("{}", output::format_response(&response, format));
    Ok(())
}
