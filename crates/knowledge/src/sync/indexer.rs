//! Replace-by-id writes to the vector store.

use crate::document::{
    employee_document, leave_request_document, Document, EmployeeRecord, LeaveRequestRecord,
};
use crate::store::VectorStore;
use futures::stream::{self, StreamExt};
use hrdesk_core::AppResult;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Outcome of a bulk upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpsertReport {
    pub succeeded: usize,
    pub failed: usize,
    pub failed_ids: Vec<String>,
}

impl UpsertReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Writes documents so that each id holds exactly one, latest, document.
///
/// Writes to the same id are serialized; writes to different ids run
/// independently. Whether a reader can see an id as missing mid-upsert
/// depends on the store's [`VectorStore::replace`].
pub struct Indexer {
    store: Arc<dyn VectorStore>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    concurrency: usize,
}

impl Indexer {
    pub fn new(store: Arc<dyn VectorStore>, concurrency: usize) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
            concurrency: concurrency.max(1),
        }
    }

    /// Run `work` while holding the write lock of `id`.
    async fn locked<T>(&self, id: &str, work: impl Future<Output = T>) -> T {
        let lock = self
            .locks
            .lock()
            .await
            .entry(id.to_string())
            .or_default()
            .clone();

        let result = {
            let _guard = lock.lock().await;
            work.await
        };
        drop(lock);

        // Entries are only cloned under the map lock, so a count of one
        // means no writer holds or waits on this id.
        let mut locks = self.locks.lock().await;
        if locks.get(id).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(id);
        }
        result
    }

    /// Replace whatever is stored under `document.id` with `document`.
    pub async fn upsert(&self, document: Document) -> AppResult<()> {
        let id = document.id.clone();
        self.locked(&id, async {
            debug!(id = %id, "Upserting document");
            self.store.replace(document).await
        })
        .await
    }

    /// Delete every document from `source` whose id is not in `keep`.
    /// Returns the removed ids, sorted.
    pub async fn remove_stale(&self, source: &str, keep: &HashSet<String>) -> AppResult<Vec<String>> {
        let mut stale: Vec<String> = self
            .store
            .ids_from_source(source)
            .await?
            .into_iter()
            .filter(|id| !keep.contains(id))
            .collect();
        stale.sort();

        for id in &stale {
            self.locked(id, self.store.delete(std::slice::from_ref(id)))
                .await?;
            debug!(id = %id, "Removed stale document");
        }

        if !stale.is_empty() {
            info!(removed = stale.len(), "Removed documents no longer in the source");
        }
        Ok(stale)
    }

    /// Upsert every document, continuing past individual failures.
    ///
    /// Duplicate ids inside the batch collapse to the last occurrence.
    pub async fn upsert_all(&self, documents: Vec<Document>) -> UpsertReport {
        let documents = dedupe_last_wins(documents);
        let total = documents.len();

        let results: Vec<(String, AppResult<()>)> = stream::iter(documents)
            .map(|doc| async move {
                let id = doc.id.clone();
                (id, self.upsert(doc).await)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = UpsertReport::default();
        for (id, result) in results {
            match result {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    warn!(id = %id, error = %e, "Failed to upsert document");
                    report.failed += 1;
                    report.failed_ids.push(id);
                }
            }
        }
        report.failed_ids.sort();

        info!(
            total,
            succeeded = report.succeeded,
            failed = report.failed,
            "Bulk upsert finished"
        );
        report
    }

    /// Rebuild and replace one employee's document. Returns its id.
    pub async fn upsert_employee(&self, employee: &EmployeeRecord) -> AppResult<String> {
        let document = employee_document(employee);
        let id = document.id.clone();
        self.upsert(document).await?;
        info!(id = %id, "Employee document updated");
        Ok(id)
    }

    /// Rebuild and replace one leave request's document. Returns its id.
    pub async fn upsert_leave_request(&self, leave: &LeaveRequestRecord) -> AppResult<String> {
        let document = leave_request_document(leave);
        let id = document.id.clone();
        self.upsert(document).await?;
        info!(id = %id, "Leave request document updated");
        Ok(id)
    }
}

fn dedupe_last_wins(documents: Vec<Document>) -> Vec<Document> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Document> = documents
        .into_iter()
        .rev()
        .filter(|doc| seen.insert(doc.id.clone()))
        .collect();
    unique.reverse();
    unique
}
