//! Error types for HR Desk.
//!
//! This module defines a unified error enum covering every failure category
//! in the workspace: configuration, I/O, generation, retrieval, index writes,
//! upstream snapshot fetches, prompts and serialization.

use thiserror::Error;

/// Unified error type for HR Desk.
///
/// All fallible functions return `Result<T, AppError>`. The chat pipeline
/// converts these into fixed user-facing messages at its boundary, so an
/// `AppError` never reaches a chat caller as raw text.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generation provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Similarity search and embedding errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Vector index write errors (add/delete)
    #[error("Index error: {0}")]
    Index(String),

    /// Upstream snapshot fetch errors
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
