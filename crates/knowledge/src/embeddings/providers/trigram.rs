//! Character-trigram embeddings for local, offline operation.

use crate::embeddings::provider::EmbeddingProvider;
use crate::normalize::normalize;
use hrdesk_core::{AppError, AppResult};
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

/// Spanish and English function words that carry no retrieval signal.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // English
        "the", "is", "at", "which", "on", "an", "as", "are", "was", "were", "for", "to", "of",
        "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has",
        "had", "it", "its", "their", "they", "them", "who", "what",
        // Spanish
        "el", "la", "los", "las", "un", "una", "unos", "unas", "de", "del", "en", "y", "que",
        "con", "por", "para", "se", "su", "sus", "al", "es", "son", "hay", "esta", "como",
        "quien", "quienes", "cual",
    ]
    .into_iter()
    .collect()
});

/// Deterministic embedding provider based on character trigrams and word
/// frequencies.
///
/// Not semantically accurate like a neural model, but consistent and
/// diacritic-insensitive, which is what tests and offline use need.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn generate_trigram_embedding(&self, text: &str) -> AppResult<Vec<f32>> {
        if self.dimensions == 0 {
            return Err(AppError::Retrieval(
                "Trigram embeddings need at least one dimension".to_string(),
            ));
        }

        let mut embedding = vec![0.0; self.dimensions];
        let normalized = normalize(text);

        // BTreeMap keeps accumulation order fixed, so float sums are reproducible.
        let mut word_freq: BTreeMap<&str, u32> = BTreeMap::new();
        for word in normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
        {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                let trigram_hash = trigram
                    .bytes()
                    .fold(0u64, |acc, b| acc.wrapping_mul(37).wrapping_add(b as u64));

                let dim_idx = (trigram_hash as usize) % self.dimensions;
                embedding[dim_idx] += (*freq as f32).sqrt();
            }

            let word_hash = word
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            let base_dim = (word_hash as usize) % self.dimensions;
            embedding[base_dim] += *freq as f32;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        Ok(embedding)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| self.generate_trigram_embedding(text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_trigram_provider_embed_single() {
        let provider = TrigramProvider::new(384);
        let embedding = provider.embed("Portal Web Corporativo").await.unwrap();

        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_trigram_provider_deterministic() {
        let provider = TrigramProvider::new(384);
        let text = "Solicitud de ausencia de Ana Pérez";

        let embedding1 = provider.embed(text).await.unwrap();
        let embedding2 = provider.embed(text).await.unwrap();
        assert_eq!(embedding1, embedding2);
    }

    #[tokio::test]
    async fn test_trigram_provider_ignores_diacritics() {
        let provider = TrigramProvider::new(384);

        let accented = provider.embed("Migración Cloud").await.unwrap();
        let plain = provider.embed("migracion cloud").await.unwrap();
        assert_eq!(accented, plain);
    }

    #[tokio::test]
    async fn test_trigram_provider_related_texts_score_higher() {
        let provider = TrigramProvider::new(384);

        let query = provider.embed("empleados con Kubernetes").await.unwrap();
        let related = provider.embed("skills in Kubernetes, Docker").await.unwrap();
        let unrelated = provider.embed("Leave request, vacation").await.unwrap();
        assert!(cosine(&query, &related) > cosine(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_trigram_provider_empty_text() {
        let provider = TrigramProvider::new(384);
        let embedding = provider.embed("").await.unwrap();

        assert_eq!(embedding.len(), 384);
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_trigram_provider_zero_dimensions() {
        let provider = TrigramProvider::new(0);
        assert!(provider.embed("hola").await.is_err());
    }
}
