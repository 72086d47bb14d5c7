//! Subjects command

use crate::app::OutputFormat;
use crate::output;
use anyhow::Result;
use studyroot_core::Config;

pub async fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let subjects = output::SubjectRow::from_config(config)?;
    print!("{}", output::format_subjects(&subjects, format));
    Ok(())
}
