//! HTTP client for external LLM services (Groq, Ollama, vLLM, OpenAI, etc.)

use super::cache::{embedding_cache_key, LLMCache};
use crate::config::LLMServiceConfig;
use crate::error::{Result, StudyRootError};
use crate::pipeline::sanitize::repair_utf8;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Trait for LLM service clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate chat completion
    async fn chat_completion(&self, request: ChatRequest) -> Result<String>;

    /// Generate embeddings for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Chat message for completion requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One chat completion call: persona, prompt and sampling settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(
        model: impl Into<String>,
        persona: impl Into<String>,
        prompt: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::system(persona), ChatMessage::user(prompt)],
            temperature,
            max_tokens,
        }
    }

    /// Text of the system message
    pub fn persona(&self) -> &str {
        self.message("system")
    }

    /// Text of the user message
    pub fn prompt(&self) -> &str {
        self.message("user")
    }

    fn message(&self, role: &str) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// OpenAI-compatible client (`/v1/chat/completions`, `/v1/embeddings`)
pub struct HttpLLMClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
    cache: LLMCache,
}

impl HttpLLMClient {
    /// Create new client from configuration
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            config,
            cache: LLMCache::new(),
        })
    }

    async fn post_json<B, R>(&self, url: &str, api_key: Option<&str>, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut req = self.http_client.post(url).json(body);

        if let Some(api_key) = api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let text = repair_utf8(&bytes);

        if !status.is_success() {
            return Err(StudyRootError::ExternalError(format!(
                "LLM service error (HTTP {}): {}",
                status, text
            )));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl LLMClient for HttpLLMClient {
    async fn chat_completion(&self, request: ChatRequest) -> Result<String> {
        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessage,
        }

        let start = Instant::now();
        let url = format!("{}/v1/chat/completions", self.config.url);

        let chat_response: ChatResponse = self
            .post_json(&url, self.config.api_key.as_deref(), &request)
            .await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| StudyRootError::Llm("No response from LLM".to_string()))?
            .message
            .content;

        tracing::debug!(
            "Chat completion from {} in {}ms",
            request.model,
            start.elapsed().as_millis()
        );

        Ok(content)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let cache_key = embedding_cache_key(&self.config.embedding_model, text);
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(embedding) = serde_json::from_str::<Vec<f32>>(&cached) {
                tracing::debug!("Embedding cache hit");
                return Ok(embedding);
            }
        }

        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            input: Vec<&'a str>,
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            data: Vec<EmbedData>,
        }

        #[derive(Deserialize)]
        struct EmbedData {
            embedding: Vec<f32>,
        }

        let request = EmbedRequest {
            model: &self.config.embedding_model,
            input: vec![text],
        };

        let url = format!("{}/v1/embeddings", self.config.embeddings_url());
        let api_key = self
            .config
            .embedding_api_key
            .as_deref()
            .or(if self.config.embedding_url.is_none() {
                self.config.api_key.as_deref()
            } else {
                None
            });

        let response: EmbedResponse = self.post_json(&url, api_key, &request).await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| StudyRootError::Llm("No embedding returned".to_string()))?
            .embedding;

        if let Ok(json) = serde_json::to_string(&embedding) {
            self.cache.set(cache_key, json);
        }

        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
