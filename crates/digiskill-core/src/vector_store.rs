//! Vector store trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// An indexed knowledge chunk, with its similarity score when returned from a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDocument {
    pub id: String,
    pub content: String,
    pub embedding: Option<Vec<f32>>,
    pub metadata: serde_json::Value,
    pub score: Option<f32>,
}

impl VectorDocument {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        embedding: Option<Vec<f32>>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            embedding,
            metadata,
            score: None,
        }
    }

    /// Copy of this chunk carrying a search score
    pub fn scored(&self, score: f32) -> Self {
        Self {
            score: Some(score),
            ..self.clone()
        }
    }
}

/// Ranked search hits, best first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub documents: Vec<VectorDocument>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub top_k: usize,
    /// Hits scoring below this are dropped before truncation
    pub score_threshold: Option<f32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            score_threshold: None,
        }
    }
}

/// Storage and similarity search over embedded chunks
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn connect(&mut self) -> Result<()>;

    /// Store a batch of chunks, returning their ids.
    ///
    /// Nothing is written when any chunk in the batch is rejected.
    async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>>;

    /// Rank chunks by similarity to a query embedding
    async fn search_by_vector(&self, vector: Vec<f32>, config: &SearchConfig) -> Result<SearchResult>;

    /// Rank chunks by keyword overlap with the query text, for when no query
    /// embedding is available
    async fn search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult>;

    async fn count(&self) -> Result<usize>;

    fn is_connected(&self) -> bool;
}
