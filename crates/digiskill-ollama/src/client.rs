//! Ollama client implementation

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use digiskill_core::{
    EmbeddingProvider, GenerationConfig, GenerationResult, LLMProvider,
    Error, Result,
};

use crate::config::OllamaConfig;

/// Ollama client, serving both text generation and embeddings
pub struct OllamaClient {
    config: OllamaConfig,
    base: Url,
    client: Client,
    available_models: Vec<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

fn request_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Network(e.to_string())
    }
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let mut base = Url::parse(&config.base_url).map_err(|e| {
            Error::Configuration(format!("Invalid Ollama base URL '{}': {}", config.base_url, e))
        })?;
        // Url::join replaces the last path segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        // Request deadlines are enforced per call so they surface as `Error::Timeout`
        let client = Client::builder()
            .connect_timeout(config.timeout())
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            config,
            base,
            client,
            available_models: Vec::new(),
        })
    }

    /// Models reported by the server during `connect`
    pub fn available_models(&self) -> &[String] {
        &self.available_models
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::Configuration(format!("Invalid Ollama endpoint '{}': {}", path, e)))
    }

    fn has_model(&self, wanted: &str) -> bool {
        self.available_models.iter().any(|name| {
            name == wanted || (!wanted.contains(':') && name.split(':').next() == Some(wanted))
        })
    }

    /// Perform the actual generation request
    async fn perform_generation(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let request_body = GenerateRequest {
            model: &config.model_id,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: config.max_tokens,
                temperature: config.temperature,
                top_k: config.top_k,
                top_p: config.top_p,
                stop: config.stop_sequences.clone(),
            },
        };

        let url = self.endpoint("api/generate")?;
        debug!(model = %config.model_id, prompt_chars = prompt.len(), "ollama generate");

        let response = self
            .client
            .post(url)
            .json(&request_body)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::LLMProvider(format!(
                "Ollama generate request failed with status {}: {}",
                status, error_text
            )));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let text = data.response.trim().to_string();
        if text.is_empty() {
            return Err(Error::LLMProvider("Empty response from Ollama".to_string()));
        }

        Ok(GenerationResult {
            text,
            model_id: config.model_id.clone(),
            tokens_used: data.eval_count,
        })
    }

    async fn perform_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.endpoint("api/embeddings")?;
        let request_body = EmbeddingRequest {
            model: &self.config.embedding_model,
            prompt: text,
        };

        let response = self
            .client
            .post(url)
            .json(&request_body)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Embedding(format!(
                "Ollama embeddings request failed with status {}: {}",
                status, error_text
            )));
        }

        let data: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        if data.embedding.is_empty() {
            return Err(Error::Embedding(format!(
                "Model '{}' returned an empty embedding",
                self.config.embedding_model
            )));
        }

        Ok(data.embedding)
    }
}

#[async_trait]
impl LLMProvider for OllamaClient {
    async fn connect(&mut self) -> Result<()> {
        let url = self.endpoint("api/tags")?;

        let response = self
            .client
            .get(url)
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|e| match request_error(e) {
                Error::Network(message) => Error::Network(format!("Ollama is not reachable at {}: {}", self.base, message)),
                other => other,
            })?;

        if !response.status().is_success() {
            return Err(Error::LLMProvider(format!(
                "Ollama model listing failed: {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        self.available_models = tags.models.into_iter().map(|m| m.name).collect();

        for wanted in [&self.config.model, &self.config.embedding_model] {
            if !self.has_model(wanted) {
                return Err(Error::LLMProvider(format!(
                    "Model '{}' is not available on {} (run `ollama pull {}`)",
                    wanted, self.base, wanted
                )));
            }
        }

        debug!(models = ?self.available_models, "connected to ollama");
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let config = GenerationConfig {
            model_id: self.config.model.clone(),
            timeout: self.config.timeout(),
            ..Default::default()
        };
        self.generate_with_config(prompt, &config).await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let generation_future = self.perform_generation(prompt, config);

        match timeout(config.timeout, generation_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "Generation did not finish within {}s",
                config.timeout.as_secs()
            ))),
        }
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match timeout(self.config.timeout(), self.perform_embedding(text)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout("Embedding request timed out".to_string())),
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        stream::iter(texts.iter().cloned())
            .map(|text| async move { self.embed(&text).await })
            .buffered(self.config.embed_concurrency.max(1))
            .try_collect()
            .await
    }

    fn embedding_model(&self) -> &str {
        &self.config.embedding_model
    }
}
