//! Document indexer implementation

use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use digiskill_core::{
    DocumentIndexer, Document, IndexingResult, IndexingConfig,
    EmbeddingProvider, VectorStore, VectorDocument,
    Error, Result,
};

use crate::loader::load_document;
use crate::splitter::RecursiveCharacterTextSplitter;

/// Chunks documents, embeds the chunks in batches and writes them to a vector store
pub struct LocalDocumentIndexer<V: VectorStore, E: EmbeddingProvider> {
    vector_store: Arc<V>,
    embedder: Arc<E>,
    splitter: RecursiveCharacterTextSplitter,
    config: IndexingConfig,
}

impl<V: VectorStore, E: EmbeddingProvider> LocalDocumentIndexer<V, E> {
    /// Create a new indexer with the default chunking configuration
    pub fn new(vector_store: Arc<V>, embedder: Arc<E>) -> Result<Self> {
        Self::with_config(vector_store, embedder, IndexingConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(vector_store: Arc<V>, embedder: Arc<E>, config: IndexingConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(Error::Configuration("Indexing batch size must be greater than zero".to_string()));
        }
        let splitter = RecursiveCharacterTextSplitter::new(config.chunk_size, config.chunk_overlap)?;

        Ok(Self {
            vector_store,
            embedder,
            splitter,
            config,
        })
    }

    fn chunk_metadata(document: &Document, index: usize, total_chunks: usize) -> serde_json::Value {
        let mut metadata = if document.metadata.is_object() {
            document.metadata.clone()
        } else {
            json!({})
        };
        metadata["chunk_index"] = json!(index);
        metadata["total_chunks"] = json!(total_chunks);
        metadata["title"] = json!(document.title);
        if let Some(ref url) = document.url {
            metadata["url"] = json!(url);
        }
        metadata
    }
}

#[async_trait]
impl<V: VectorStore + 'static, E: EmbeddingProvider + 'static> DocumentIndexer for LocalDocumentIndexer<V, E> {
    async fn index_document(&self, document: Document) -> Result<IndexingResult> {
        let chunks = self.splitter.split_text(&document.content);
        let total_chunks = chunks.len();
        let mut result = IndexingResult::default();

        debug!(document = %document.id, chunks = total_chunks, "indexing document");

        for (batch_index, batch) in chunks.chunks(self.config.batch_size).enumerate() {
            let offset = batch_index * self.config.batch_size;

            let embeddings = match self.embedder.embed_batch(batch).await {
                Ok(embeddings) if embeddings.len() == batch.len() => embeddings,
                Ok(embeddings) => {
                    result.documents_failed += batch.len();
                    result.errors.push(format!(
                        "Embedding model returned {} vectors for {} chunks of {}",
                        embeddings.len(),
                        batch.len(),
                        document.title
                    ));
                    continue;
                }
                Err(e) => {
                    result.documents_failed += batch.len();
                    result.errors.push(format!(
                        "Failed to embed chunks {}..{} of {}: {}",
                        offset,
                        offset + batch.len(),
                        document.title,
                        e
                    ));
                    continue;
                }
            };

            let vector_docs: Vec<VectorDocument> = batch
                .iter()
                .zip(embeddings)
                .enumerate()
                .map(|(i, (chunk, embedding))| {
                    let index = offset + i;
                    VectorDocument::new(
                        format!("{}_{}", document.id, index),
                        chunk.as_str(),
                        Some(embedding),
                        Self::chunk_metadata(&document, index, total_chunks),
                    )
                })
                .collect();

            match self.vector_store.store_batch(vector_docs).await {
                Ok(ids) => result.documents_indexed += ids.len(),
                Err(e) => {
                    result.documents_failed += batch.len();
                    result.errors.push(format!("Failed to store chunks {}..{}: {}", offset, offset + batch.len(), e));
                }
            }
        }

        for error in &result.errors {
            warn!(document = %document.id, "{}", error);
        }

        Ok(result)
    }

    async fn index_from_file(&self, path: &Path) -> Result<IndexingResult> {
        let document = load_document(path).await?;
        self.index_document(document).await
    }

    async fn stats(&self) -> Result<serde_json::Value> {
        let count = self.vector_store.count().await?;
        Ok(json!({
            "total_chunks": count,
            "chunk_size": self.config.chunk_size,
            "chunk_overlap": self.config.chunk_overlap,
            "embedding_model": self.embedder.embedding_model(),
        }))
    }
}
