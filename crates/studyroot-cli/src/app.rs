//! CLI argument definitions

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "studyroot")]
#[command(
    author,
    version,
    about = "Ask study questions, grounded in your course material"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question
    Ask(AskArgs),

    /// Browse or delete answered questions
    History(HistoryArgs),

    /// List configured subjects
    Subjects,
}

#[derive(Args)]
pub struct AskArgs {
    /// Question text
    #[arg(required = true)]
    pub question: Vec<String>,

    /// Subject label, e.g. "Artificial Intelligence"
    #[arg(short, long)]
    pub subject: String,

    /// Student id
    #[arg(short, long, env = "STUDYROOT_USER")]
    pub user: i64,

    /// Re-explain a previously answered question with an analogy
    #[arg(long)]
    pub deep: bool,
}

impl AskArgs {
    pub fn question_text(&self) -> String {
        self.question.join(" ")
    }
}

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List all entries, newest first
    #[command(alias = "ls")]
    List {
        #[arg(short, long, env = "STUDYROOT_USER")]
        user: i64,
    },
    /// Show one day's entries, oldest first
    Show {
        #[arg(short, long, env = "STUDYROOT_USER")]
        user: i64,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Delete one day's entries
    #[command(alias = "rm")]
    Delete {
        #[arg(short, long, env = "STUDYROOT_USER")]
        user: i64,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Cli,
    Json,
}
