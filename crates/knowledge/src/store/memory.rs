//! In-process vector store.

use super::{SearchRequest, VectorStore};
use crate::document::Document;
use crate::embeddings::EmbeddingProvider;
use hrdesk_core::{AppError, AppResult};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

struct Entry {
    document: Document,
    embedding: Vec<f32>,
}

/// Vector store keeping documents and their embeddings in memory.
///
/// Documents are embedded on `add`; queries are embedded on every search.
/// Results are ordered by cosine similarity, ties broken by id.
pub struct InMemoryVectorStore {
    embedder: Arc<dyn EmbeddingProvider>,
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl InMemoryVectorStore {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Fetch a document by id.
    pub async fn get(&self, id: &str) -> Option<Document> {
        self.entries
            .read()
            .await
            .get(id)
            .map(|entry| entry.document.clone())
    }

    /// Ids of every indexed document, sorted.
    pub async fn ids(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait::async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add(&self, documents: Vec<Document>) -> AppResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| AppError::Index(format!("Failed to embed documents: {}", e)))?;

        if embeddings.len() != documents.len() {
            return Err(AppError::Index(format!(
                "Embedder returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }

        let mut entries = self.entries.write().await;
        for (document, embedding) in documents.into_iter().zip(embeddings) {
            tracing::trace!(id = %document.id, "Indexing document");
            entries.insert(
                document.id.clone(),
                Entry {
                    document,
                    embedding,
                },
            );
        }

        Ok(())
    }

    async fn delete(&self, ids: &[String]) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        for id in ids {
            entries.remove(id);
        }
        Ok(())
    }

    /// Embeds before touching the map, so a failed embedding keeps the
    /// previous version.
    async fn replace(&self, document: Document) -> AppResult<()> {
        self.add(vec![document]).await
    }

    async fn ids_from_source(&self, source: &str) -> AppResult<Vec<String>> {
        Ok(self
            .entries
            .read()
            .await
            .values()
            .filter(|entry| entry.document.metadata.source == source)
            .map(|entry| entry.document.id.clone())
            .collect())
    }

    async fn similarity_search(&self, request: &SearchRequest) -> AppResult<Vec<Document>> {
        if request.top_k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(&request.query).await?;
        let entries = self.entries.read().await;

        let mut scored: Vec<(f32, &Entry)> = entries
            .values()
            .filter(|entry| {
                request
                    .filter
                    .as_ref()
                    .map(|f| f.matches(&entry.document.metadata))
                    .unwrap_or(true)
            })
            .map(|entry| (cosine_similarity(&query_embedding, &entry.embedding), entry))
            .collect();

        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b
                .partial_cmp(score_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.document.id.cmp(&b.document.id))
        });
        scored.truncate(request.top_k);

        tracing::debug!(
            filter = %request.filter.as_ref().map(|f| f.to_string()).unwrap_or_else(|| "none".to_string()),
            hits = scored.len(),
            top_score = scored.first().map(|(s, _)| *s).unwrap_or(0.0),
            "Similarity search"
        );

        Ok(scored
            .into_iter()
            .map(|(_, entry)| entry.document.clone())
            .collect())
    }

    async fn len(&self) -> AppResult<usize> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{
        employee_document, project_document, DocumentType, EmployeeRecord, MetadataField,
        ProjectRecord,
    };
    use crate::embeddings::TrigramProvider;
    use crate::filter::Filter;
    use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

    fn store() -> InMemoryVectorStore {
        InMemoryVectorStore::new(Arc::new(TrigramProvider::new(384)))
    }

    fn employee(id: i64, name: &str, department: &str, skills: &[&str]) -> Document {
        employee_document(&EmployeeRecord {
            id,
            name: name.to_string(),
            email: None,
            location: "Madrid".to_string(),
            hire_date: None,
            department: department.to_string(),
            job_position: "Developer".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            projects: Vec::new(),
            contract_type: None,
            weekly_hours: None,
            contract_start_date: None,
            contract_end_date: None,
            base_salary: None,
            bonus: None,
            leave_requests: Vec::new(),
        })
    }

    fn project(code: &str, name: &str) -> Document {
        project_document(&ProjectRecord {
            code: code.to_string(),
            name: name.to_string(),
            client: "Nike".to_string(),
            ubication: "Madrid".to_string(),
            start_date: None,
            end_date: None,
        })
    }

    #[tokio::test]
    async fn test_add_overwrites_same_id() {
        let store = store();
        store.add(vec![employee(1, "Ana Pérez", "Data", &[])]).await.unwrap();
        store.add(vec![employee(1, "Ana Pérez", "Marketing", &[])]).await.unwrap();

        assert_eq!(store.len().await.unwrap(), 1);
        let doc = store.get("employee:1").await.unwrap();
        assert_eq!(doc.metadata.get(MetadataField::Department), Some("Marketing"));
    }

    #[tokio::test]
    async fn test_delete_ignores_unknown_ids() {
        let store = store();
        store.add(vec![project("PRJ001", "Migración Cloud")]).await.unwrap();

        store
            .delete(&["project:PRJ001".to_string(), "project:NOPE".to_string()])
            .await
            .unwrap();
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_search_applies_filter_and_top_k() {
        let store = store();
        store
            .add(vec![
                employee(1, "Ana Pérez", "Desarrollo", &["Kubernetes"]),
                employee(2, "Luis Gómez", "Desarrollo", &["Excel"]),
                employee(3, "Marta Ruiz", "Marketing", &["Kubernetes"]),
                project("PRJ001", "Migración Cloud"),
            ])
            .await
            .unwrap();

        let request = SearchRequest::new("Kubernetes", 1).with_filter(
            Filter::of_type(DocumentType::Employee).and(MetadataField::Department, "desarrollo"),
        );
        let results = store.similarity_search(&request).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "employee:1");
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let store = store();
        store
            .add(vec![
                project("PRJ001", "Migración Cloud"),
                project("PRJ003", "Portal Web Corporativo"),
            ])
            .await
            .unwrap();

        let results = store
            .similarity_search(&SearchRequest::new("portal web corporativo", 5))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "project:PRJ003");
    }

    /// Trigram embeddings that start failing once `failing` is set.
    #[derive(Debug)]
    struct SwitchableEmbedder {
        inner: TrigramProvider,
        failing: AtomicBool,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for SwitchableEmbedder {
        fn provider_name(&self) -> &str {
            "switchable"
        }

        fn model_name(&self) -> &str {
            self.inner.model_name()
        }

        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }

        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            if self.failing.load(AtomicOrdering::SeqCst) {
                return Err(AppError::Index("embedding backend down".to_string()));
            }
            self.inner.embed_batch(texts).await
        }
    }

    #[tokio::test]
    async fn test_failed_replace_keeps_previous_version() {
        let embedder = Arc::new(SwitchableEmbedder {
            inner: TrigramProvider::new(64),
            failing: AtomicBool::new(false),
        });
        let store = InMemoryVectorStore::new(embedder.clone());
        store.add(vec![employee(1, "Ana Pérez", "Data", &[])]).await.unwrap();

        embedder.failing.store(true, AtomicOrdering::SeqCst);
        let result = store.replace(employee(1, "Ana Pérez", "Marketing", &[])).await;

        assert!(matches!(result, Err(AppError::Index(_))));
        let doc = store.get("employee:1").await.unwrap();
        assert_eq!(doc.metadata.get(MetadataField::Department), Some("Data"));
    }

    #[tokio::test]
    async fn test_ids_from_source() {
        let store = store();
        let mut foreign = project("PRJ009", "Intranet");
        foreign.metadata.source = "manual".to_string();
        store
            .add(vec![project("PRJ001", "Migración Cloud"), foreign])
            .await
            .unwrap();

        let ids = store.ids_from_source(crate::document::SOURCE_TAG).await.unwrap();
        assert_eq!(ids, vec!["project:PRJ001".to_string()]);
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
