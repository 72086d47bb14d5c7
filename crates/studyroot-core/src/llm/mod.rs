//! LLM integration
//!
//! Provides traits and implementations for:
//! - Chat completion via external services (Groq, vLLM, OpenAI, etc.)
//! - Query embedding via external services (Ollama, vLLM, OpenAI, etc.)

mod cache;
mod client;
mod http_embedder;
mod traits;

pub use cache::{embedding_cache_key, LLMCache};
pub use client::{ChatMessage, ChatRequest, HttpLLMClient, LLMClient};
pub use http_embedder::HttpEmbedder;
pub use traits::*;
