//! Chatbot service: lazily built RAG engine with canned fallback replies

use futures::future::{BoxFuture, FutureExt};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use digiskill_core::{IndexingConfig, LLMProvider, RAGEngine, Result, VectorStore};
use digiskill_ollama::{OllamaClient, OllamaConfig};
use digiskill_rag::{LocalDocumentIndexer, LocalRAGEngine, LocalVectorStore};

use crate::config::{AppConfig, RagConfig};

pub const FALLBACK_RESPONSES: [&str; 5] = [
    "I'm here to help you with digital skills! What would you like to know?",
    "Welcome to the Digital Skills Assessment Platform! How can I assist you today?",
    "I can help you learn about digital literacy, online safety, and technology skills. What's on your mind?",
    "Feel free to ask me about digital skills, internet safety, or technology topics!",
    "I'm your digital skills assistant. What would you like to learn about today?",
];

/// Builds a ready-to-query engine; called once per initialization attempt
pub type EngineLoader = Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn RAGEngine>>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RagStatus {
    Initialized,
    NotAvailable,
}

pub fn fallback_reply() -> &'static str {
    FALLBACK_RESPONSES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_RESPONSES[0])
}

/// Answers chat messages, with the RAG engine when it can be built and a canned
/// reply otherwise.
///
/// Initialization is single-flight: callers that arrive while an attempt is
/// running wait for it and share its outcome. A failed attempt is retried by
/// the next message.
pub struct ChatService {
    engine: RwLock<Option<Arc<dyn RAGEngine>>>,
    init_gate: Mutex<()>,
    attempts: AtomicU64,
    loader: Option<EngineLoader>,
}

impl ChatService {
    pub fn new(loader: EngineLoader) -> Self {
        Self {
            engine: RwLock::new(None),
            init_gate: Mutex::new(()),
            attempts: AtomicU64::new(0),
            loader: Some(loader),
        }
    }

    /// A service that never builds an engine and always falls back
    pub fn disabled() -> Self {
        Self {
            engine: RwLock::new(None),
            init_gate: Mutex::new(()),
            attempts: AtomicU64::new(0),
            loader: None,
        }
    }

    /// A service around an engine that is already initialized
    pub fn with_engine(engine: Arc<dyn RAGEngine>) -> Self {
        Self {
            engine: RwLock::new(Some(engine)),
            init_gate: Mutex::new(()),
            attempts: AtomicU64::new(0),
            loader: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        if !config.rag.enabled {
            info!("RAG disabled; chat uses fallback replies");
            return Self::disabled();
        }

        let rag = config.rag.clone();
        let ollama = config.ollama.clone();
        Self::new(Box::new(move || {
            let rag = rag.clone();
            let ollama = ollama.clone();
            async move { build_engine(&rag, &ollama).await }.boxed()
        }))
    }

    pub async fn status(&self) -> RagStatus {
        if self.engine.read().await.is_some() {
            RagStatus::Initialized
        } else {
            RagStatus::NotAvailable
        }
    }

    /// The engine, building it first if needed; `None` when it is unavailable
    pub async fn engine(&self) -> Option<Arc<dyn RAGEngine>> {
        if let Some(engine) = self.engine.read().await.clone() {
            return Some(engine);
        }
        let loader = self.loader.as_ref()?;

        let seen = self.attempts.load(Ordering::SeqCst);
        let _gate = self.init_gate.lock().await;

        if let Some(engine) = self.engine.read().await.clone() {
            return Some(engine);
        }
        // An attempt finished and failed while this caller was waiting
        if self.attempts.load(Ordering::SeqCst) != seen {
            return None;
        }

        info!("initializing RAG bot");
        let outcome = loader().await;
        self.attempts.fetch_add(1, Ordering::SeqCst);

        match outcome {
            Ok(engine) => {
                *self.engine.write().await = Some(engine.clone());
                info!("RAG bot initialized");
                Some(engine)
            }
            Err(e) => {
                warn!(error = %e, "RAG bot initialization failed; chat falls back to canned replies");
                None
            }
        }
    }

    /// Reply to a chat message. Errors from an initialized engine are returned.
    pub async fn reply(&self, message: &str) -> Result<String> {
        match self.engine().await {
            Some(engine) => engine.answer(message).await,
            None => Ok(fallback_reply().to_string()),
        }
    }

    /// Start initialization in the background
    pub fn spawn_init(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.engine().await;
        })
    }
}

/// Connect to Ollama, index the knowledge file and return the engine
pub async fn build_engine(rag: &RagConfig, ollama: &OllamaConfig) -> Result<Arc<dyn RAGEngine>> {
    let mut client = OllamaClient::new(ollama.clone())?;
    client.connect().await?;
    let client = Arc::new(client);

    let mut vector_store = LocalVectorStore::new();
    vector_store.connect().await?;
    let vector_store = Arc::new(vector_store);

    let indexing = IndexingConfig {
        chunk_size: rag.chunk_size,
        chunk_overlap: rag.chunk_overlap,
        ..Default::default()
    };
    let document_indexer = Arc::new(LocalDocumentIndexer::with_config(vector_store.clone(), client.clone(), indexing)?);

    let mut engine = LocalRAGEngine::new(vector_store, document_indexer, client.clone(), client)
        .with_knowledge_file(&rag.knowledge_file)
        .with_top_k(rag.top_k);
    engine.initialize().await?;
    let stats = engine.stats().await?;
    info!(stats = %stats, "knowledge base ready");

    Ok(Arc::new(engine))
}
