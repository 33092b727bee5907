//! Generation client factory.

use crate::client::LlmClient;
use crate::providers::OllamaClient;
use crate::types::ProviderType;
use std::sync::Arc;

/// Create a generation client for the configured provider.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama")
/// * `endpoint` - Optional custom endpoint URL
///
/// # Errors
/// Returns a message naming the provider when it is unknown.
pub fn create_client(provider: &str, endpoint: Option<&str>) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;

    match provider_type {
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(provider_type.default_endpoint());
            tracing::debug!(base_url, "Creating Ollama generation client");
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
    }
}
