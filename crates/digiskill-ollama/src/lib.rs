//! Ollama integration for digiskill
//!
//! This crate provides the Ollama implementation of the `LLMProvider` and
//! `EmbeddingProvider` traits, talking to a local `ollama serve` over HTTP.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::OllamaClient;
pub use config::{OllamaConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

// Re-export core types for convenience
pub use digiskill_core::{
    LLMProvider, EmbeddingProvider, GenerationConfig, GenerationResult,
    Error, Result,
};
