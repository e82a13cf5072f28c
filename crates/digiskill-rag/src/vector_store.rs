//! In-memory vector store

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use digiskill_core::{
    VectorStore, VectorDocument, SearchResult, SearchConfig,
    Error, Result,
};

#[derive(Default)]
struct StoreInner {
    documents: HashMap<String, VectorDocument>,
    dimension: Option<usize>,
}

/// Local in-memory vector store
///
/// All embeddings must share one dimension; the first embedded document fixes it.
pub struct LocalVectorStore {
    inner: RwLock<StoreInner>,
    connected: bool,
}

impl LocalVectorStore {
    /// Create a new local vector store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            connected: false,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))
    }

    /// Dimension the store will have after accepting `documents`
    fn check_dimensions(current: Option<usize>, documents: &[VectorDocument]) -> Result<Option<usize>> {
        let mut dimension = current;
        for document in documents {
            let Some(embedding) = &document.embedding else {
                continue;
            };
            match dimension {
                Some(expected) if expected != embedding.len() => {
                    return Err(Error::VectorStore(format!(
                        "Embedding for '{}' has dimension {}, store expects {}",
                        document.id,
                        embedding.len(),
                        expected
                    )));
                }
                Some(_) => {}
                None => dimension = Some(embedding.len()),
            }
        }
        Ok(dimension)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: &str) -> Option<VectorDocument> {
        self.read().ok()?.documents.get(id).cloned()
    }

    /// Cosine similarity; zero for mismatched or zero-length vectors
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    /// Fraction of query words found in the content
    fn text_similarity(query: &str, content: &str) -> f32 {
        let query_lower = query.to_lowercase();
        let content_lower = content.to_lowercase();

        let query_words: Vec<&str> = query_lower.split_whitespace().collect();
        if query_words.is_empty() {
            return 0.0;
        }

        let matches = query_words
            .iter()
            .filter(|word| content_lower.contains(*word))
            .count();

        matches as f32 / query_words.len() as f32
    }

    fn rank(mut results: Vec<VectorDocument>, config: &SearchConfig) -> SearchResult {
        if let Some(threshold) = config.score_threshold {
            results.retain(|doc| doc.score.unwrap_or(0.0) >= threshold);
        }

        results.sort_by(|a, b| {
            let (sa, sb) = (a.score.unwrap_or(0.0), b.score.unwrap_or(0.0));
            match sb.total_cmp(&sa) {
                Ordering::Equal => a.id.cmp(&b.id),
                other => other,
            }
        });
        results.truncate(config.top_k);

        let total = results.len();
        SearchResult {
            documents: results,
            total,
        }
    }
}

impl Default for LocalVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
        let mut inner = self.write()?;
        inner.dimension = Self::check_dimensions(inner.dimension, &documents)?;

        let ids = documents
            .into_iter()
            .map(|document| {
                let id = document.id.clone();
                inner.documents.insert(id.clone(), document);
                id
            })
            .collect();
        Ok(ids)
    }

    async fn search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult> {
        let inner = self.read()?;

        let results = inner
            .documents
            .values()
            .map(|doc| doc.scored(Self::text_similarity(query, &doc.content)))
            .collect();

        Ok(Self::rank(results, config))
    }

    async fn search_by_vector(&self, vector: Vec<f32>, config: &SearchConfig) -> Result<SearchResult> {
        let inner = self.read()?;

        if let Some(dimension) = inner.dimension {
            if dimension != vector.len() {
                return Err(Error::VectorStore(format!(
                    "Query vector has dimension {}, store expects {}",
                    vector.len(),
                    dimension
                )));
            }
        }

        let results = inner
            .documents
            .values()
            .filter_map(|doc| {
                let embedding = doc.embedding.as_ref()?;
                Some(doc.scored(Self::cosine_similarity(&vector, embedding)))
            })
            .collect();

        Ok(Self::rank(results, config))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.documents.len())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
