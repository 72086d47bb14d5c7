//! Error types for studyroot

use thiserror::Error;

/// Result type alias using StudyRootError
pub type Result<T> = std::result::Result<T, StudyRootError>;

/// Error type alias for convenience
pub type Error = StudyRootError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for studyroot
#[derive(Debug, Error)]
pub enum StudyRootError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External service error: {0}")]
    ExternalError(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl StudyRootError {
    /// Unknown subject keys are configuration errors
    pub fn unknown_subject(key: &str) -> Self {
        Self::Config(format!("Subject not found: {}", key))
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Index(_) => exit_codes::NOT_FOUND,
            Self::InvalidInput(_) | Self::Config(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            StudyRootError::unknown_subject("physics").exit_code(),
            exit_codes::INVALID_INPUT
        );
        assert_eq!(
            StudyRootError::Index("missing manifest".into()).exit_code(),
            exit_codes::NOT_FOUND
        );
        assert_eq!(
            StudyRootError::ExternalError("HTTP 500".into()).exit_code(),
            exit_codes::GENERAL_ERROR
        );
    }

    #[test]
    fn test_unknown_subject_message() {
        let err = StudyRootError::unknown_subject("physics");
        assert_eq!(err.to_string(), "Configuration error: Subject not found: physics");
    }
}
