//! Response bodies returned by the answer pipeline

use super::classifier::Classification;
use serde::Serialize;

/// Shown when generation fails or the answer fails the quality gate
pub const UNRELIABLE_ANSWER_ERROR: &str =
    "Unable to generate a reliable answer. Please refine your question.";

/// Shown next to a cached answer when the deep explanation cannot be produced
pub const DEEP_EXPLANATION_ERROR: &str = "Could not generate deep explanation";

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Replayed from history
    Cache,
    /// Analogy-based re-explanation of a cached answer
    DeepExplanation,
    /// Study guidance
    Mentoring,
    /// Grounded on subject material
    Rag,
    /// Model knowledge only
    Llm,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Cache => "cache",
            AnswerSource::DeepExplanation => "deep_explanation",
            AnswerSource::Mentoring => "mentoring",
            AnswerSource::Rag => "rag",
            AnswerSource::Llm => "llm",
        }
    }
}

/// Outcome of a question. Serializes to the flat JSON body clients expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AskResponse {
    Answered {
        answer: String,
        deep_explanation: Option<String>,
        cached: bool,
        source: AnswerSource,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        classification: Option<Classification>,
    },
    /// The cached answer is still returned alongside the error
    DeepExplanationFailed {
        answer: String,
        error: String,
        cached: bool,
    },
    Failed {
        error: String,
        answer: Option<String>,
    },
}

impl AskResponse {
    pub(crate) fn cached(answer: String) -> Self {
        AskResponse::Answered {
            answer,
            deep_explanation: None,
            cached: true,
            source: AnswerSource::Cache,
            classification: None,
        }
    }

    pub(crate) fn deep_explanation(answer: String, explanation: String) -> Self {
        AskResponse::Answered {
            answer,
            deep_explanation: Some(explanation),
            cached: true,
            source: AnswerSource::DeepExplanation,
            classification: None,
        }
    }

    pub(crate) fn fresh(
        answer: String,
        source: AnswerSource,
        classification: Classification,
    ) -> Self {
        AskResponse::Answered {
            answer,
            deep_explanation: None,
            cached: false,
            source,
            classification: Some(classification),
        }
    }

    pub(crate) fn deep_explanation_failed(answer: String) -> Self {
        AskResponse::DeepExplanationFailed {
            answer,
            error: DEEP_EXPLANATION_ERROR.to_string(),
            cached: true,
        }
    }

    pub(crate) fn unreliable() -> Self {
        AskResponse::Failed {
            error: UNRELIABLE_ANSWER_ERROR.to_string(),
            answer: None,
        }
    }

    /// Answer text, if any
    pub fn answer(&self) -> Option<&str> {
        match self {
            AskResponse::Answered { answer, .. } => Some(answer),
            AskResponse::DeepExplanationFailed { answer, .. } => Some(answer),
            AskResponse::Failed { answer, .. } => answer.as_deref(),
        }
    }

    /// Error message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            AskResponse::Answered { .. } => None,
            AskResponse::DeepExplanationFailed { error, .. } | AskResponse::Failed { error, .. } => {
                Some(error)
            }
        }
    }

    pub fn source(&self) -> Option<AnswerSource> {
        match self {
            AskResponse::Answered { source, .. } => Some(*source),
            _ => None,
        }
    }

    pub fn is_cached(&self) -> bool {
        match self {
            AskResponse::Answered { cached, .. } | AskResponse::DeepExplanationFailed { cached, .. } => {
                *cached
            }
            AskResponse::Failed { .. } => false,
        }
    }
}
