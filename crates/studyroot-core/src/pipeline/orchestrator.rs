//! Request state machine: cache lookup, classification, retrieval,
//! generation, quality check and persistence.

use super::classifier::{classify, Classification};
use super::generator::Generator;
use super::quality;
use super::response::AskResponse;
use super::sanitize::sanitize;
use crate::config::Config;
use crate::db::{HistoryEntry, HistoryStore, NewHistoryEntry};
use crate::error::{Result, StudyRootError};
use crate::llm::{HttpEmbedder, HttpLLMClient, LLMClient};
use crate::retrieval::{is_relevant, IndexRegistry, Retriever};
use std::sync::Arc;

/// A student's question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub user_id: i64,
    /// Subject display label, e.g. "Artificial Intelligence"
    pub subject: String,
    /// Re-explain a cached answer instead of replaying it
    pub deep_explanation: bool,
}

impl Question {
    pub fn new(text: impl Into<String>, user_id: i64, subject: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user_id,
            subject: subject.into(),
            deep_explanation: false,
        }
    }

    pub fn with_deep_explanation(mut self, deep_explanation: bool) -> Self {
        self.deep_explanation = deep_explanation;
        self
    }
}

/// Answers questions end to end.
///
/// Every collaborator failure is absorbed here: retrieval problems degrade to
/// an ungrounded answer, generation problems become the generic error body,
/// and persistence problems are only logged.
pub struct AnswerPipeline {
    config: Arc<Config>,
    store: Arc<dyn HistoryStore>,
    retriever: Retriever,
    generator: Generator,
}

impl AnswerPipeline {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn HistoryStore>,
        retriever: Retriever,
        generator: Generator,
    ) -> Self {
        Self {
            config,
            store,
            retriever,
            generator,
        }
    }

    /// Wire the HTTP model client, embedder and subject indexes from config
    pub fn from_config(config: Config, store: Arc<dyn HistoryStore>) -> Result<Self> {
        let service = config.llm_service.clone();
        let client: Arc<dyn LLMClient> = Arc::new(HttpLLMClient::new(service.clone())?);
        let embedder = Arc::new(HttpEmbedder::new(
            client.clone(),
            service.embedding_model.clone(),
        ));
        let indexes = Arc::new(IndexRegistry::from_config(&config)?);

        Ok(Self::new(
            Arc::new(config),
            store,
            Retriever::new(embedder, indexes),
            Generator::from_config(client, &service),
        ))
    }

    /// Answer a question. Always produces a response body.
    pub async fn ask(&self, question: &Question) -> AskResponse {
        match self.lookup(question).await {
            Some(entry) if question.deep_explanation => self.explain_again(question, entry).await,
            Some(entry) => {
                tracing::debug!("Cache hit for user {} (entry {})", question.user_id, entry.id);
                AskResponse::cached(entry.answer)
            }
            None => match self.answer_fresh(question).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!("Answer generation failed: {}", e);
                    AskResponse::unreliable()
                }
            },
        }
    }

    async fn lookup(&self, question: &Question) -> Option<HistoryEntry> {
        let store = Arc::clone(&self.store);
        let (user_id, text) = (question.user_id, question.text.clone());

        match run_blocking(move || store.find_one(user_id, &text)).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("History lookup failed, treating as miss: {}", e);
                None
            }
        }
    }

    async fn explain_again(&self, question: &Question, entry: HistoryEntry) -> AskResponse {
        match self
            .generator
            .deep_explanation(&question.text, &entry.answer)
            .await
        {
            Ok(explanation) => AskResponse::deep_explanation(entry.answer, sanitize(&explanation)),
            Err(e) => {
                tracing::warn!("Deep explanation failed: {}", e);
                AskResponse::deep_explanation_failed(entry.answer)
            }
        }
    }

    async fn answer_fresh(&self, question: &Question) -> Result<AskResponse> {
        let classification = classify(&question.text);
        tracing::debug!("Classified question as {}", classification);

        let context = match classification {
            Classification::SubjectQuestion => self.grounding_context(question).await,
            _ => None,
        };

        let generated = self
            .generator
            .answer(&question.text, classification, context.as_deref())
            .await?;
        tracing::debug!("Generated answer in {:?} mode", generated.mode);

        if let Err(reason) = quality::assess(&generated.text) {
            tracing::warn!("Rejected generated answer: {}", reason);
            return Ok(AskResponse::unreliable());
        }

        let answer = sanitize(&generated.text);
        self.persist(question, &answer).await;

        Ok(AskResponse::fresh(
            answer,
            generated.mode.source(),
            classification,
        ))
    }

    /// Retrieved context that passes the relevance gate, if any
    async fn grounding_context(&self, question: &Question) -> Option<String> {
        let key = self.config.subject_key(&question.subject);

        match self.retriever.retrieve(&question.text, &key).await {
            Ok(context) if is_relevant(&context) => {
                tracing::debug!("Grounding on {} chars from '{}'", context.chars().count(), key);
                Some(context)
            }
            Ok(context) => {
                tracing::debug!(
                    "Discarding {} chars of context from '{}'",
                    context.chars().count(),
                    key
                );
                None
            }
            Err(e) => {
                tracing::warn!("Retrieval for subject '{}' failed: {}", key, e);
                None
            }
        }
    }

    async fn persist(&self, question: &Question, answer: &str) {
        let store = Arc::clone(&self.store);
        let user_id = question.user_id;
        let (text, answer, subject) = (
            question.text.clone(),
            answer.to_string(),
            question.subject.clone(),
        );

        let stored = run_blocking(move || {
            store.insert(&NewHistoryEntry {
                user_id,
                question: &text,
                answer: &answer,
                subject: &subject,
            })
        })
        .await;

        match stored {
            Ok(id) => tracing::info!("Stored answer {} for user {}", id, question.user_id),
            Err(e) => tracing::warn!("Failed to store answer: {}", e),
        }
    }
}

/// Run a synchronous store call on the blocking pool.
///
/// SQLite opens and queries stay off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StudyRootError::Other(e.into()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_builder() {
        let q = Question::new("What is a stack?", 7, "Artificial Intelligence");
        assert!(!q.deep_explanation);
        assert!(q.with_deep_explanation(true).deep_explanation);
    }
}
