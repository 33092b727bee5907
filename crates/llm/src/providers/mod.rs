//! Concrete generation providers.

mod ollama;

pub use ollama::OllamaClient;
