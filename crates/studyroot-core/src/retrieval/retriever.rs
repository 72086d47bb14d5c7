//! Context retrieval for grounding subject answers

use super::registry::IndexRegistry;
use crate::error::Result;
use crate::llm::Embedder;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

/// Passages fetched per question
pub const TOP_K: usize = 3;

/// Hard cap on context length, in characters
pub const MAX_CONTEXT_CHARS: usize = 1500;

lazy_static! {
    static ref BEGIN_ENV_RE: Regex = Regex::new(r"\\begin\{.*?\}").unwrap();
    static ref END_ENV_RE: Regex = Regex::new(r"\\end\{.*?\}").unwrap();
    static ref COMMAND_RE: Regex = Regex::new(r"\\[a-zA-Z]+").unwrap();
    static ref COMMENT_RE: Regex = Regex::new(r"%.*").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Embeds questions and pulls the nearest passages from a subject index
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    indexes: Arc<IndexRegistry>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, indexes: Arc<IndexRegistry>) -> Self {
        Self { embedder, indexes }
    }

    /// Build cleaned, truncated context for a question.
    ///
    /// Fails on unknown subjects and on embedding or index errors.
    pub async fn retrieve(&self, question: &str, subject_key: &str) -> Result<String> {
        let index = self.indexes.fetch(subject_key).await?;
        let query = self.embedder.embed(question).await?;
        let hits = index.search(&query, TOP_K)?;

        let texts: Vec<String> = hits
            .iter()
            .filter_map(|&i| index.passage(i))
            .map(|p| p.text().into_owned())
            .collect();

        tracing::debug!(
            "Retrieved {} of {} passages for subject '{}' ({})",
            texts.len(),
            hits.len(),
            subject_key,
            self.embedder.model_name()
        );

        let context = clean_context(&texts.join(" "));
        Ok(truncate_chars(&context, MAX_CONTEXT_CHARS).to_string())
    }
}

/// Strip LaTeX markup and comments, collapse whitespace
pub fn clean_context(text: &str) -> String {
    let text = BEGIN_ENV_RE.replace_all(text, "");
    let text = END_ENV_RE.replace_all(&text, "");
    let text = COMMAND_RE.replace_all(&text, "");
    let text = COMMENT_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// First `max_chars` characters of `text`. Not word-boundary aware.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_context_strips_latex() {
        let raw = "\\begin{itemize} \\item Neurons  fire\n\n\\end{itemize} % a comment\nweights";
        assert_eq!(clean_context(raw), "Neurons fire weights");
    }

    #[test]
    fn test_clean_context_keeps_plain_text() {
        assert_eq!(
            clean_context("  A   perceptron\tis a\nlinear classifier. "),
            "A perceptron is a linear classifier."
        );
    }

    #[test]
    fn test_comment_runs_to_end_of_line_only() {
        assert_eq!(clean_context("keep % drop this\nand this stays"), "keep and this stays");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars(&"x".repeat(2000), MAX_CONTEXT_CHARS).len(), 1500);
    }
}
