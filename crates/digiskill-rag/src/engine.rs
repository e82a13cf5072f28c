//! RAG engine implementation

use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use digiskill_core::{
    RAGEngine, RAGQuery, RAGResult,
    VectorStore, VectorDocument, SearchConfig,
    DocumentIndexer, IndexingResult,
    EmbeddingProvider, LLMProvider,
    Error, Result,
};

/// Default number of chunks handed to the model as context
pub const DEFAULT_TOP_K: usize = 4;

/// Retrieval-QA prompt, "stuffing" every retrieved chunk into one request
fn qa_prompt(context: &str, question: &str) -> String {
    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\
         \n\
         {context}\n\
         \n\
         Question: {question}\n\
         Helpful Answer:"
    )
}

/// Local RAG engine: knowledge files are indexed into an in-process store
/// and answers come from the configured language model.
pub struct LocalRAGEngine<V, D, E, L>
where
    V: VectorStore,
    D: DocumentIndexer,
    E: EmbeddingProvider,
    L: LLMProvider,
{
    vector_store: Arc<V>,
    document_indexer: Arc<D>,
    embedder: Arc<E>,
    llm: Arc<L>,
    knowledge_files: Vec<PathBuf>,
    top_k: usize,
    initialized: bool,
}

impl<V, D, E, L> LocalRAGEngine<V, D, E, L>
where
    V: VectorStore,
    D: DocumentIndexer,
    E: EmbeddingProvider,
    L: LLMProvider,
{
    /// Create a new local RAG engine
    pub fn new(vector_store: Arc<V>, document_indexer: Arc<D>, embedder: Arc<E>, llm: Arc<L>) -> Self {
        Self {
            vector_store,
            document_indexer,
            embedder,
            llm,
            knowledge_files: Vec::new(),
            top_k: DEFAULT_TOP_K,
            initialized: false,
        }
    }

    /// Add a knowledge file to index during `initialize`
    pub fn with_knowledge_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.knowledge_files.push(path.into());
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    async fn index_knowledge(&self) -> Result<IndexingResult> {
        let mut total = IndexingResult::default();

        for path in &self.knowledge_files {
            info!(path = %path.display(), "loading knowledge file");
            let result = self.document_indexer.index_from_file(path).await?;
            info!(
                path = %path.display(),
                chunks = result.documents_indexed,
                failed = result.documents_failed,
                "knowledge file indexed"
            );
            total.merge(result);
        }

        Ok(total)
    }
}

#[async_trait]
impl<V, D, E, L> RAGEngine for LocalRAGEngine<V, D, E, L>
where
    V: VectorStore + 'static,
    D: DocumentIndexer + 'static,
    E: EmbeddingProvider + 'static,
    L: LLMProvider + 'static,
{
    async fn initialize(&mut self) -> Result<()> {
        if !self.vector_store.is_connected() {
            return Err(Error::RAGEngine("Vector store not connected".to_string()));
        }
        if self.knowledge_files.is_empty() {
            return Err(Error::RAGEngine("No knowledge files configured".to_string()));
        }

        let result = self.index_knowledge().await?;

        if self.vector_store.count().await? == 0 {
            let reason = result
                .errors
                .first()
                .cloned()
                .unwrap_or_else(|| "knowledge files contain no text".to_string());
            return Err(Error::RAGEngine(format!("No chunks were indexed: {}", reason)));
        }
        if result.documents_failed > 0 {
            warn!(failed = result.documents_failed, "some knowledge chunks could not be indexed");
        }

        self.initialized = true;
        Ok(())
    }

    async fn retrieve(&self, query: &RAGQuery) -> Result<RAGResult> {
        if !self.initialized {
            return Err(Error::RAGEngine("RAG engine not initialized".to_string()));
        }

        let search_config = SearchConfig::from(query);
        let search_result = match self.embedder.embed(&query.query).await {
            Ok(query_vector) => self.vector_store.search_by_vector(query_vector, &search_config).await?,
            Err(e) => {
                warn!(error = %e, "query embedding failed, falling back to keyword search");
                self.vector_store.search(&query.query, &search_config).await?
            }
        };
        let context = self.build_context(&search_result.documents);

        Ok(RAGResult {
            documents: search_result.documents,
            context,
            metadata: Some(json!({
                "query": query.query,
                "top_k": query.top_k,
                "results_count": search_result.total,
            })),
        })
    }

    fn build_context(&self, documents: &[VectorDocument]) -> String {
        documents
            .iter()
            .map(|doc| doc.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    async fn enhance_prompt(&self, question: &str, query: &RAGQuery) -> Result<String> {
        let rag_result = self.retrieve(query).await?;
        Ok(qa_prompt(&rag_result.context, question))
    }

    async fn answer(&self, question: &str) -> Result<String> {
        let query = RAGQuery::new(question, self.top_k);
        let prompt = self.enhance_prompt(question, &query).await?;
        let result = self.llm.generate(&prompt).await?;
        Ok(result.text.trim().to_string())
    }

    async fn stats(&self) -> Result<serde_json::Value> {
        let vector_count = self.vector_store.count().await?;
        let indexer_stats = self.document_indexer.stats().await?;

        Ok(json!({
            "initialized": self.initialized,
            "vector_store_count": vector_count,
            "indexer_stats": indexer_stats,
            "knowledge_files": self.knowledge_files.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "model": self.llm.model_id(),
            "top_k": self.top_k,
        }))
    }
}
