//! Concrete embedding providers.

mod ollama;
mod trigram;

pub use ollama::OllamaEmbeddingProvider;
pub use trigram::TrigramProvider;
