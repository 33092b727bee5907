//! Sync command handler.

use clap::Args;
use hrdesk_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Fetch the company snapshot and report what was indexed
#[derive(Args, Debug)]
pub struct SyncCommand {
    /// Read the company snapshot from a JSON file instead of the endpoint
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SyncCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing sync command");

        let (_store, handle) = super::start_sync(config, self.snapshot.as_deref())?;
        let report = super::join_sync(handle).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Source:     {}", report.source);
        println!("Attempts:   {}", report.attempts);
        println!("Records:    {}", report.records);
        println!("Documents:  {}", report.documents);
        println!("Indexed:    {}", report.upsert.succeeded);
        println!("Removed:    {}", report.removed);
        if !report.upsert.is_complete() {
            println!("Failed:     {}", report.upsert.failed);
            for id in &report.upsert.failed_ids {
                println!("  - {}", id);
            }
        }
        println!("Duration:   {:.2}s", report.duration_secs);

        Ok(())
    }
}
