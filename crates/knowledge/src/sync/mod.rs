//! Keeping the vector index in step with the upstream company state.
//!
//! A full sync fetches a [`CompanySnapshot`] with a bounded, fixed-delay
//! retry loop, rebuilds every document, upserts them and then removes the
//! synced documents whose record left the snapshot. The index is only
//! written once a snapshot was fetched, so a failed sync leaves the last
//! synced state in place.

pub mod indexer;
pub mod source;

pub use indexer::{Indexer, UpsertReport};
pub use source::{FileSnapshotSource, HttpSnapshotSource, SnapshotSource};

use crate::document::{snapshot_documents, CompanySnapshot, SOURCE_TAG};
use hrdesk_core::config::SyncSettings;
use hrdesk_core::{AppError, AppResult};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl From<&SyncSettings> for RetryPolicy {
    fn from(settings: &SyncSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            backoff: Duration::from_secs(settings.backoff_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub source: String,
    /// Fetch attempts used, including the successful one
    pub attempts: u32,
    pub records: usize,
    pub documents: usize,
    pub upsert: UpsertReport,
    /// Previously synced documents deleted because their record is gone
    pub removed: usize,
    pub duration_secs: f64,
}

/// Fetch with retries. Gives up after `policy.max_attempts` failures.
pub async fn fetch_with_retry(
    source: &dyn SnapshotSource,
    policy: RetryPolicy,
) -> AppResult<(CompanySnapshot, u32)> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match source.fetch().await {
            Ok(snapshot) => return Ok((snapshot, attempt)),
            Err(e) if attempt < max_attempts => {
                warn!(
                    "Snapshot fetch from {} failed (attempt {}/{}), retrying in {:?}: {}",
                    source.describe(),
                    attempt,
                    max_attempts,
                    policy.backoff,
                    e
                );
                tokio::time::sleep(policy.backoff).await;
            }
            Err(e) => {
                error!(
                    source = %source.describe(),
                    attempts = attempt,
                    error = %e,
                    "Giving up on snapshot sync; index left unchanged"
                );
                return Err(AppError::Snapshot(format!(
                    "Snapshot unavailable after {} attempts: {}",
                    attempt, e
                )));
            }
        }
    }
}

/// Fetch a snapshot, upsert every document built from it and drop the
/// synced documents it no longer contains.
pub async fn sync_from_source(
    source: &dyn SnapshotSource,
    indexer: &Indexer,
    policy: RetryPolicy,
) -> AppResult<SyncReport> {
    let start = Instant::now();
    info!(source = %source.describe(), "Starting snapshot sync");

    let (snapshot, attempts) = fetch_with_retry(source, policy).await?;
    let documents = snapshot_documents(&snapshot);
    let document_count = documents.len();
    let current: HashSet<String> = documents.iter().map(|doc| doc.id.clone()).collect();

    let upsert = indexer.upsert_all(documents).await;
    let removed = match indexer.remove_stale(SOURCE_TAG, &current).await {
        Ok(ids) => ids.len(),
        Err(e) => {
            warn!(error = %e, "Failed to remove documents missing from the snapshot");
            0
        }
    };

    let report = SyncReport {
        source: source.describe(),
        attempts,
        records: snapshot.record_count(),
        documents: document_count,
        upsert,
        removed,
        duration_secs: start.elapsed().as_secs_f64(),
    };

    info!(
        records = report.records,
        documents = report.documents,
        failed = report.upsert.failed,
        removed = report.removed,
        "Snapshot sync completed in {:.2}s",
        report.duration_secs
    );
    Ok(report)
}

/// Run [`sync_from_source`] on the runtime without blocking the caller.
pub fn spawn_sync(
    source: Arc<dyn SnapshotSource>,
    indexer: Arc<Indexer>,
    policy: RetryPolicy,
) -> JoinHandle<AppResult<SyncReport>> {
    tokio::spawn(async move { sync_from_source(source.as_ref(), &indexer, policy).await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DepartmentRecord, SkillRecord};
    use crate::embeddings::TrigramProvider;
    use crate::store::{InMemoryVectorStore, VectorStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` fetches, then serves `snapshot`.
    struct FlakySource {
        failures: u32,
        calls: AtomicU32,
        snapshot: CompanySnapshot,
    }

    #[async_trait]
    impl SnapshotSource for FlakySource {
        fn describe(&self) -> String {
            "flaky".to_string()
        }

        async fn fetch(&self) -> AppResult<CompanySnapshot> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(AppError::Snapshot("connection refused".to_string()))
            } else {
                Ok(self.snapshot.clone())
            }
        }
    }

    fn snapshot() -> CompanySnapshot {
        CompanySnapshot {
            departments: vec![DepartmentRecord {
                name: "Data".to_string(),
                description: None,
            }],
            skills: vec![SkillRecord {
                name: "Docker".to_string(),
                description: Some("Containers".to_string()),
            }],
            ..Default::default()
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff: Duration::from_millis(1),
        }
    }

    fn indexer() -> (Arc<InMemoryVectorStore>, Indexer) {
        let store = Arc::new(InMemoryVectorStore::new(Arc::new(TrigramProvider::new(64))));
        (store.clone(), Indexer::new(store, 2))
    }

    #[tokio::test]
    async fn test_sync_retries_then_succeeds() {
        let (store, indexer) = indexer();
        let source = FlakySource {
            failures: 2,
            calls: AtomicU32::new(0),
            snapshot: snapshot(),
        };

        let report = sync_from_source(&source, &indexer, policy(3)).await.unwrap();

        assert_eq!(report.attempts, 3);
        assert_eq!(report.records, 2);
        assert_eq!(report.upsert.succeeded, 2);
        assert_eq!(
            store.ids().await,
            vec!["department:Data".to_string(), "skill:Docker".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failed_sync_leaves_index_untouched() {
        let (store, indexer) = indexer();
        indexer
            .upsert_all(crate::document::snapshot_documents(&snapshot()))
            .await;

        let source = FlakySource {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
            snapshot: CompanySnapshot::default(),
        };
        let err = sync_from_source(&source, &indexer, policy(3)).await.unwrap_err();

        assert!(matches!(err, AppError::Snapshot(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_resync_removes_documents_missing_from_snapshot() {
        let (store, indexer) = indexer();
        let first = FlakySource {
            failures: 0,
            calls: AtomicU32::new(0),
            snapshot: snapshot(),
        };
        sync_from_source(&first, &indexer, policy(1)).await.unwrap();

        let mut shrunk = snapshot();
        shrunk.skills.clear();
        let second = FlakySource {
            failures: 0,
            calls: AtomicU32::new(0),
            snapshot: shrunk,
        };
        let report = sync_from_source(&second, &indexer, policy(1)).await.unwrap();

        assert_eq!(report.removed, 1);
        assert_eq!(store.ids().await, vec!["department:Data".to_string()]);
    }

    #[tokio::test]
    async fn test_spawned_sync() {
        let (store, indexer) = indexer();
        let source = Arc::new(FlakySource {
            failures: 0,
            calls: AtomicU32::new(0),
            snapshot: snapshot(),
        });

        let handle = spawn_sync(source, Arc::new(indexer), policy(1));
        let report = handle.await.unwrap().unwrap();

        assert_eq!(report.attempts, 1);
        assert_eq!(store.len().await.unwrap(), 2);
    }
}
