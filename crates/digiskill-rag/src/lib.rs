//! Retrieval-augmented generation for the digiskill chatbot
//!
//! This crate provides the text splitter, knowledge file loader, in-memory vector
//! store, document indexer and the retrieval-QA engine built on top of them.

mod splitter;
mod loader;
mod vector_store;
mod document_indexer;
mod engine;


pub use splitter::{RecursiveCharacterTextSplitter, DEFAULT_SEPARATORS};
pub use loader::{load_document, markdown_to_text, normalize_text};
pub use vector_store::LocalVectorStore;
pub use document_indexer::LocalDocumentIndexer;
pub use engine::{LocalRAGEngine, DEFAULT_TOP_K};

// Re-export core types for convenience
pub use digiskill_core::{
    RAGEngine, RAGQuery, RAGResult,
    VectorStore, VectorDocument, SearchResult, SearchConfig,
    DocumentIndexer, Document, IndexingResult, IndexingConfig,
    EmbeddingProvider, LLMProvider,
    Error, Result,
};
