//! Core traits and types for digiskill
//!
//! This crate defines the seams shared by the rest of the workspace: the error type,
//! the LLM and embedding provider interfaces, and the vector store, document indexer
//! and RAG engine abstractions used by the chatbot.

pub mod llm;
pub mod embedding;
pub mod rag;
pub mod vector_store;
pub mod document_indexer;
pub mod error;

pub use error::{Error, Result};
pub use llm::{LLMProvider, GenerationConfig, GenerationResult};
pub use embedding::EmbeddingProvider;
pub use rag::{RAGEngine, RAGQuery, RAGResult};
pub use vector_store::{VectorStore, VectorDocument, SearchResult, SearchConfig};
pub use document_indexer::{DocumentIndexer, Document, IndexingResult, IndexingConfig};
