//! StudyRoot CLI
//!
//! Ask study questions and browse the answers you already got.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use studyroot_core::error::exit_codes;
use studyroot_core::{Config, Database, SqliteHistoryStore, StudyRootError};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<StudyRootError>()
            .map(StudyRootError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Ask(args) => commands::ask::run(args, config, open_store()?, cli.format).await,
        Commands::History(args) => commands::history::run(args, &open_store()?, cli.format).await,
        Commands::Subjects => commands::subjects::run(&config, cli.format).await,
    }
}

/// Open the history store (use STUDYROOT_DB env var if set, otherwise use default)
fn open_store() -> Result<SqliteHistoryStore> {
    let db_path = std::env::var("STUDYROOT_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Database::default_path());
    Ok(SqliteHistoryStore::open(&db_path)?)
}
