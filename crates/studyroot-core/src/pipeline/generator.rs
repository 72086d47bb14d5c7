//! Answer generation: mode selection, prompts and bounded model calls

use super::classifier::{token_count, Classification};
use super::response::AnswerSource;
use crate::config::LLMServiceConfig;
use crate::error::{Result, StudyRootError};
use crate::llm::{ChatRequest, LLMClient};
use crate::retrieval::is_relevant;
use std::sync::Arc;
use std::time::{Duration, Instant};

const STRUCTURED_PERSONA: &str = "Answer as an expert using a structured format:\n\
[Title] [Definition] [Explanation] [Key Points]\n\
Use simple words. Max 250 words. Don't fabricate. Say if unsure.";

const TERSE_PERSONA: &str = "You are a concise academic assistant. \
Answer in 3-4 sentences max using plain English. Be direct.";

const MENTOR_PERSONA: &str = "You are a supportive mentor. \
Give practical, actionable advice in simple English with step-by-step guidance. \
Be encouraging. Max 200 words.";

const ANALOGY_PERSONA: &str = "Explain using a real-world analogy. \
Use simple 8th-grade English. Focus on intuition, not formulas. Max 180 words.";

/// Words that keep a short question out of terse mode
const TERSE_EXCLUSIONS: &[&str] = &["what", "why", "how", "difference", "compare"];

/// How an answer is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Structured answer from retrieved material
    Grounded,
    /// Structured answer from model knowledge
    Ungrounded,
    /// Three or four plain sentences
    Terse,
    /// Actionable study guidance
    Mentoring,
    /// Analogy-based re-explanation of an earlier answer
    DeepExplanation,
}

impl GenerationMode {
    pub fn persona(&self) -> &'static str {
        match self {
            GenerationMode::Grounded | GenerationMode::Ungrounded => STRUCTURED_PERSONA,
            GenerationMode::Terse => TERSE_PERSONA,
            GenerationMode::Mentoring => MENTOR_PERSONA,
            GenerationMode::DeepExplanation => ANALOGY_PERSONA,
        }
    }

    pub fn temperature(&self) -> f32 {
        match self {
            GenerationMode::Grounded | GenerationMode::Ungrounded | GenerationMode::Terse => 0.3,
            GenerationMode::Mentoring => 0.5,
            GenerationMode::DeepExplanation => 0.6,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            GenerationMode::Grounded | GenerationMode::Ungrounded | GenerationMode::Terse => 350,
            GenerationMode::Mentoring | GenerationMode::DeepExplanation => 300,
        }
    }

    /// Source reported for answers produced in this mode
    pub fn source(&self) -> AnswerSource {
        match self {
            GenerationMode::Grounded => AnswerSource::Rag,
            GenerationMode::Mentoring => AnswerSource::Mentoring,
            GenerationMode::DeepExplanation => AnswerSource::DeepExplanation,
            GenerationMode::Ungrounded | GenerationMode::Terse => AnswerSource::Llm,
        }
    }
}

/// Whether a question is short enough for a terse answer
pub fn is_terse(question: &str) -> bool {
    let lower = question.trim().to_lowercase();
    token_count(&lower) <= 3 && !TERSE_EXCLUSIONS.iter().any(|w| lower.contains(w))
}

/// Pick the mode and build the user prompt for a fresh answer.
///
/// Grounded mode is only chosen when `context` passes the relevance gate.
pub fn plan_answer(
    question: &str,
    classification: Classification,
    context: Option<&str>,
) -> (GenerationMode, String) {
    if classification == Classification::GuidanceQuestion {
        return (
            GenerationMode::Mentoring,
            format!(
                "Student asks: {}\n\nRespond with practical mentor guidance.",
                question
            ),
        );
    }

    if is_terse(question) {
        return (
            GenerationMode::Terse,
            format!("Explain briefly: {}", question),
        );
    }

    match context.filter(|c| is_relevant(c)) {
        Some(material) => (
            GenerationMode::Grounded,
            format!(
                "Material: {}\n\nQ: {}\n\nAnswer based on the material only.",
                material, question
            ),
        ),
        None => (
            GenerationMode::Ungrounded,
            format!("Q: {}\n\nAnswer clearly.", question),
        ),
    }
}

/// Prompt asking for an analogy-based re-explanation
pub fn deep_explanation_prompt(question: &str, original_answer: &str) -> String {
    format!(
        "Q: {}\nOriginal answer: {}\n\nExplain differently using a relatable analogy.",
        question, original_answer
    )
}

/// Raw model output and the mode that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub text: String,
    pub mode: GenerationMode,
}

/// Runs chat completions with per-mode settings and a hard deadline
pub struct Generator {
    client: Arc<dyn LLMClient>,
    model: String,
    timeout: Duration,
}

impl Generator {
    pub fn new(client: Arc<dyn LLMClient>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
        }
    }

    pub fn from_config(client: Arc<dyn LLMClient>, config: &LLMServiceConfig) -> Self {
        Self::new(
            client,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Generate a fresh answer
    pub async fn answer(
        &self,
        question: &str,
        classification: Classification,
        context: Option<&str>,
    ) -> Result<Generated> {
        let (mode, prompt) = plan_answer(question, classification, context);
        let text = self.complete(mode, prompt).await?;
        Ok(Generated { text, mode })
    }

    /// Re-explain an earlier answer through an analogy
    pub async fn deep_explanation(&self, question: &str, original_answer: &str) -> Result<String> {
        let prompt = deep_explanation_prompt(question, original_answer);
        self.complete(GenerationMode::DeepExplanation, prompt).await
    }

    async fn complete(&self, mode: GenerationMode, prompt: String) -> Result<String> {
        let request = ChatRequest::new(
            self.model.as_str(),
            mode.persona(),
            prompt,
            mode.temperature(),
            mode.max_tokens(),
        );

        let start = Instant::now();
        let text = tokio::time::timeout(self.timeout, self.client.chat_completion(request))
            .await
            .map_err(|_| {
                StudyRootError::Timeout(format!(
                    "{:?} generation exceeded {}s",
                    mode,
                    self.timeout.as_secs()
                ))
            })??;

        tracing::debug!(
            "{:?} generation via {} returned {} chars in {}ms",
            mode,
            self.client.model_name(),
            text.chars().count(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}
