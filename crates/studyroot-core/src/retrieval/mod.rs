//! Retrieval of grounding context from subject vector indexes

mod index;
mod passage;
mod registry;
mod relevance;
mod retriever;
pub mod vectors;

pub use index::{IndexManifest, VectorIndex, EMBEDDINGS_FILE, MANIFEST_FILE, PASSAGES_FILE};
pub use passage::Passage;
pub use registry::IndexRegistry;
pub use relevance::{is_relevant, MIN_CONTEXT_CHARS};
pub use retriever::{clean_context, truncate_chars, Retriever, MAX_CONTEXT_CHARS, TOP_K};
