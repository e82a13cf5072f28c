//! Ollama configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use digiskill_core::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3";

/// Configuration for the Ollama client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub embedding_model: String,
    pub timeout_secs: u64,
    pub embed_concurrency: usize,
}

impl OllamaConfig {
    /// Create configuration from a key lookup, usually the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("OLLAMA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = lookup("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        // The same model serves embeddings unless told otherwise
        let embedding_model = lookup("OLLAMA_EMBEDDING_MODEL").unwrap_or_else(|| model.clone());

        let timeout_secs = match lookup("OLLAMA_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Configuration(format!("OLLAMA_TIMEOUT_SECS must be a number of seconds, got '{}'", raw))
            })?,
            None => 120,
        };

        let embed_concurrency = match lookup("OLLAMA_EMBED_CONCURRENCY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::Configuration(format!(
                        "OLLAMA_EMBED_CONCURRENCY must be a positive number, got '{}'",
                        raw
                    )));
                }
            },
            None => 4,
        };

        Ok(Self {
            base_url,
            model,
            embedding_model,
            timeout_secs,
            embed_concurrency,
        })
    }

    /// Create configuration with explicit values
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            base_url: base_url.into(),
            embedding_model: model.clone(),
            model,
            timeout_secs: 120,
            embed_concurrency: 4,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL)
    }
}
