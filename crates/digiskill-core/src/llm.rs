//! LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub stop_sequences: Vec<String>,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "llama3".to_string(),
            max_tokens: 512,
            temperature: None,
            top_p: None,
            top_k: None,
            stop_sequences: Vec::new(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Result of a text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
}

/// Trait for LLM providers (e.g., a local Ollama server)
///
/// Implementations are connected once with `connect` and then shared read-only,
/// so every generation method takes `&self`.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Connect to the provider and verify the configured model is available
    async fn connect(&mut self) -> Result<()>;

    /// Generate text using the LLM with default configuration
    async fn generate(&self, prompt: &str) -> Result<GenerationResult>;

    /// Generate text with custom configuration
    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.model_id, "llama3");
        assert_eq!(config.max_tokens, 512);
        assert!(config.stop_sequences.is_empty());
        assert_eq!(config.timeout, Duration::from_secs(120));
    }
}
