//! Vector store abstraction consumed by the retrieval cascade and sync.

mod memory;

pub use memory::InMemoryVectorStore;

use crate::document::Document;
use crate::filter::Filter;
use hrdesk_core::AppResult;

/// One similarity search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,

    /// Metadata constraint; `None` searches every document
    pub filter: Option<Filter>,

    /// Maximum documents returned
    pub top_k: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, top_k: usize) -> Self {
        Self {
            query: query.into(),
            filter: None,
            top_k,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Trait for vector index backends.
///
/// `similarity_search` returns documents ordered by descending similarity,
/// at most `top_k` of them. Writes are not atomic across calls: with the
/// default `replace`, a reader may observe an id as missing between its
/// `delete` and the following `add`.
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert documents; an existing id is overwritten.
    async fn add(&self, documents: Vec<Document>) -> AppResult<()>;

    /// Remove documents by id. Unknown ids are ignored.
    async fn delete(&self, ids: &[String]) -> AppResult<()>;

    /// Swap the document stored under `document.id` for `document`.
    ///
    /// The default deletes then adds, so a failed add leaves the id empty
    /// until the next write. Stores that can index before removing should
    /// override it.
    async fn replace(&self, document: Document) -> AppResult<()> {
        let id = document.id.clone();
        self.delete(std::slice::from_ref(&id)).await?;
        self.add(vec![document]).await.inspect_err(|e| {
            tracing::error!(
                id = %id,
                error = %e,
                "Previous version removed but its replacement failed to index"
            );
        })
    }

    /// Ids of every document whose metadata `source` equals `source`.
    async fn ids_from_source(&self, source: &str) -> AppResult<Vec<String>>;

    async fn similarity_search(&self, request: &SearchRequest) -> AppResult<Vec<Document>>;

    /// Number of indexed documents.
    async fn len(&self) -> AppResult<usize>;

    async fn is_empty(&self) -> AppResult<bool> {
        Ok(self.len().await? == 0)
    }
}
