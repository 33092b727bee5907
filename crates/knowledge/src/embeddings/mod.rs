//! Embedding providers used by the in-memory vector store.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{OllamaEmbeddingProvider, TrigramProvider};
