//! Grounded answer generation.

use crate::replies::ASSISTANT_UNAVAILABLE;
use hrdesk_core::AppResult;
use hrdesk_llm::{LlmClient, LlmRequest};
use hrdesk_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Sampling temperature for answers; kept low so replies stick to the context.
const ANSWER_TEMPERATURE: f32 = 0.2;

/// Turns a question and its grounding context into a reply.
pub struct AnswerGenerator {
    client: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    model: String,
}

impl AnswerGenerator {
    pub fn new(client: Arc<dyn LlmClient>, prompt: PromptDefinition, model: impl Into<String>) -> Self {
        Self {
            client,
            prompt,
            model: model.into(),
        }
    }

    /// Generate an answer. Never fails: any prompt or generation error is
    /// logged and replaced by the fixed unavailable message.
    pub async fn generate(&self, message: &str, context: &str) -> String {
        match self.try_generate(message, context).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(provider = self.client.provider_name(), error = %e, "Answer generation failed");
                ASSISTANT_UNAVAILABLE.to_string()
            }
        }
    }

    async fn try_generate(&self, message: &str, context: &str) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("message".to_string(), message.to_string());
        variables.insert("context".to_string(), context.to_string());

        let built = build_prompt(&self.prompt, variables)?;

        let mut request =
            LlmRequest::new(built.user, self.model.as_str()).with_temperature(ANSWER_TEMPERATURE);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        tracing::debug!(
            prompt_id = %built.metadata.source_prompt_id,
            context_len = context.len(),
            "Requesting answer"
        );
        let response = self.client.complete(&request).await?;
        Ok(response.content.trim().to_string())
    }
}
