//! CLI command handlers

pub mod ask;
pub mod history;
pub mod subjects;
