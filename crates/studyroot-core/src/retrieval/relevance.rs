//! Relevance gate for retrieved context

/// Minimum context length (characters) worth grounding an answer on
pub const MIN_CONTEXT_CHARS: usize = 100;

/// Whether retrieved context is usable for grounding
pub fn is_relevant(context: &str) -> bool {
    context.chars().count() >= MIN_CONTEXT_CHARS && !context.trim().is_empty()
}
