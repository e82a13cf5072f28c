//! digiskill: digital skills assessment API with a retrieval-augmented chatbot
//!
//! The HTTP API serves a bilingual quiz, stores profiles and results in memory,
//! and answers chat messages from a local knowledge file through Ollama.

pub mod api;
pub mod chat;
pub mod config;

pub use chat::{ChatService, RagStatus, build_engine, fallback_reply, FALLBACK_RESPONSES};
pub use config::{AppConfig, RagConfig, ServerConfig};
