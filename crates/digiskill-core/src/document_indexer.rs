//! Document indexer trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// A document to be indexed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub metadata: serde_json::Value,
}

/// Result of an indexing operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexingResult {
    pub documents_indexed: usize,
    pub documents_failed: usize,
    pub errors: Vec<String>,
}

impl IndexingResult {
    /// Fold another result into this one
    pub fn merge(&mut self, other: IndexingResult) {
        self.documents_indexed += other.documents_indexed;
        self.documents_failed += other.documents_failed;
        self.errors.extend(other.errors);
    }
}

/// Configuration for document indexing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub batch_size: usize,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            batch_size: 16,
        }
    }
}

/// Trait for document indexers
///
/// An indexer chunks documents, embeds the chunks and writes them to a vector store.
#[async_trait]
pub trait DocumentIndexer: Send + Sync {
    /// Index a single document
    async fn index_document(&self, document: Document) -> Result<IndexingResult>;

    /// Index a document loaded from a local file
    async fn index_from_file(&self, path: &Path) -> Result<IndexingResult>;

    /// Get indexing statistics
    async fn stats(&self) -> Result<serde_json::Value>;
}
