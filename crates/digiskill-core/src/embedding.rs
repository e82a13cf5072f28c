//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Trait for text embedding models
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts; the output keeps the input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Name of the embedding model
    fn embedding_model(&self) -> &str;
}
