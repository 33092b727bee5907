//! Command handlers for the HR Desk CLI.

pub mod chat;
pub mod classify;
pub mod sync;

pub use chat::ChatCommand;
pub use classify::ClassifyCommand;
pub use sync::SyncCommand;

use hrdesk_core::{config::AppConfig, AppError, AppResult};
use hrdesk_knowledge::{
    create_provider, spawn_sync, FileSnapshotSource, HttpSnapshotSource, Indexer,
    InMemoryVectorStore, RetryPolicy, SnapshotSource, SyncReport,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Snapshot file when given, otherwise the configured upstream endpoint.
fn snapshot_source(config: &AppConfig, file: Option<&Path>) -> AppResult<Arc<dyn SnapshotSource>> {
    Ok(match file {
        Some(path) => Arc::new(FileSnapshotSource::new(path)),
        None => Arc::new(HttpSnapshotSource::new(&config.sync.snapshot_url)?),
    })
}

/// Build an empty index and start one full sync into it in the background.
fn start_sync(
    config: &AppConfig,
    file: Option<&Path>,
) -> AppResult<(Arc<InMemoryVectorStore>, JoinHandle<AppResult<SyncReport>>)> {
    let embedder = create_provider(&config.embedding)?;
    let store = Arc::new(InMemoryVectorStore::new(embedder));
    let indexer = Arc::new(Indexer::new(store.clone(), config.sync.upsert_concurrency));

    let source = snapshot_source(config, file)?;
    let handle = spawn_sync(source, indexer, RetryPolicy::from(&config.sync));

    Ok((store, handle))
}

/// Flatten a finished sync task into its report.
async fn join_sync(handle: JoinHandle<AppResult<SyncReport>>) -> AppResult<SyncReport> {
    handle
        .await
        .map_err(|e| AppError::Other(format!("Sync task failed: {}", e)))?
}

/// Wait at most `wait` for a started sync. `Ok(None)` means it is still
/// running and keeps filling the index in the background.
async fn wait_for_sync(
    handle: JoinHandle<AppResult<SyncReport>>,
    wait: Duration,
) -> AppResult<Option<SyncReport>> {
    match tokio::time::timeout(wait, join_sync(handle)).await {
        Ok(result) => result.map(Some),
        Err(_) => Ok(None),
    }
}
