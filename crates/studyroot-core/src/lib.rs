//! StudyRoot Core Library
//!
//! Core functionality for the studyroot question answering service.
//!
//! # Features
//! - Rule-based intent classification (subject, guidance, general chat)
//! - Retrieval of grounding passages from per-subject vector indexes
//! - Answer generation through OpenAI-compatible chat completion services
//! - Heuristic quality gate and output sanitization
//! - SQLite question history that doubles as the answer cache

pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod retrieval;

pub use config::{Config, LLMServiceConfig, SubjectConfig};
pub use db::{Database, HistoryEntry, HistoryStore, NewHistoryEntry, SqliteHistoryStore};
pub use error::{Error, Result, StudyRootError};
pub use llm::{ChatRequest, Embedder, HttpEmbedder, HttpLLMClient, LLMClient};
pub use pipeline::{
    classify, AnswerPipeline, AnswerSource, AskResponse, Classification, GenerationMode,
    Generator, Question,
};
pub use retrieval::{IndexRegistry, Passage, Retriever, VectorIndex};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "studyroot";

/// Default data directory name
pub const DATA_DIR_NAME: &str = "studyroot";
