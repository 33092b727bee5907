//! Chat command handler.

use clap::Args;
use hrdesk_core::{config::AppConfig, AppError, AppResult};
use hrdesk_knowledge::{
    AnswerGenerator, CascadeSettings, ChatPipeline, RetrievalCascade,
};
use hrdesk_llm::create_client;
use hrdesk_prompt::{resolve_prompt, ANSWER_PROMPT_ID};
use std::path::PathBuf;
use std::time::Duration;

/// Answer a question from the synced company data
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// The question to answer
    pub message: String,

    /// Answer as this employee (scopes leave and profile questions)
    #[arg(short, long)]
    pub employee_id: Option<String>,

    /// Read the company snapshot from a JSON file instead of the endpoint
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");
        tracing::debug!("Chat options: {:?}", self);

        let (store, handle) = super::start_sync(config, self.snapshot.as_deref())?;
        let wait = Duration::from_secs(config.sync.chat_wait_secs);
        // Either way the question is answered from whatever is indexed.
        match super::wait_for_sync(handle, wait).await {
            Ok(Some(report)) => {
                tracing::debug!(documents = report.documents, "Startup sync finished")
            }
            Ok(None) => tracing::warn!(
                "Startup sync still running after {:?}; answering from a partial index",
                wait
            ),
            Err(e) => tracing::warn!("Continuing without synced data: {}", e),
        }

        let client = create_client(&config.provider, config.llm_endpoint.as_deref())
            .map_err(AppError::Config)?;
        let prompt = resolve_prompt(&config.workspace, ANSWER_PROMPT_ID)?;

        let settings = CascadeSettings {
            top_k: config.retrieval.top_k,
            join_candidates: config.retrieval.join_candidates,
        };
        let pipeline = ChatPipeline::new(
            RetrievalCascade::new(store, settings),
            AnswerGenerator::new(client, prompt, config.model.as_str()),
        );

        let response = pipeline
            .respond(&self.message, self.employee_id.as_deref())
            .await;

        if self.json {
            let json = serde_json::to_string_pretty(&response)?;
            println!("{}", json);
        } else {
            println!("{}", response.answer);
            tracing::debug!(intent = %response.intent, sources = ?response.sources, "Answered");
        }

        Ok(())
    }
}
