//! RAG (Retrieval-Augmented Generation) engine trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, SearchConfig, VectorDocument};

/// Query for RAG retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RAGQuery {
    pub query: String,
    pub top_k: usize,
    pub score_threshold: Option<f32>,
}

impl RAGQuery {
    pub fn new(query: impl Into<String>, top_k: usize) -> Self {
        Self {
            query: query.into(),
            top_k,
            score_threshold: None,
        }
    }
}

impl From<&RAGQuery> for SearchConfig {
    fn from(query: &RAGQuery) -> Self {
        Self {
            top_k: query.top_k,
            score_threshold: query.score_threshold,
        }
    }
}

impl Default for RAGQuery {
    fn default() -> Self {
        Self::new(String::new(), 4)
    }
}

/// Result from RAG retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RAGResult {
    pub documents: Vec<VectorDocument>,
    pub context: String,
    pub metadata: Option<serde_json::Value>,
}

/// Trait for RAG engines
///
/// An engine is initialized once (`initialize` takes `&mut self`) and is then
/// shared behind an `Arc` to answer questions concurrently.
#[async_trait]
pub trait RAGEngine: Send + Sync {
    /// Load, chunk, embed and index the knowledge base
    async fn initialize(&mut self) -> Result<()>;

    /// Retrieve relevant documents for a query
    async fn retrieve(&self, query: &RAGQuery) -> Result<RAGResult>;

    /// Build context from retrieved documents
    fn build_context(&self, documents: &[VectorDocument]) -> String;

    /// Fill the question-answering prompt with retrieved context
    async fn enhance_prompt(&self, question: &str, query: &RAGQuery) -> Result<String>;

    /// Answer a question with the language model, grounded on retrieved context
    async fn answer(&self, question: &str) -> Result<String>;

    /// Describe the indexed knowledge base
    async fn stats(&self) -> Result<serde_json::Value>;
}
