//! Application configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use digiskill_core::{Error, Result};
use digiskill_ollama::OllamaConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_KNOWLEDGE_FILE: &str = "my-rag-bot/data/info.txt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the web UI, served for paths no API route matches
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    pub enabled: bool,
    /// Build the index at startup instead of on the first chat message
    pub eager_init: bool,
    pub knowledge_file: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            eager_init: false,
            knowledge_file: PathBuf::from(DEFAULT_KNOWLEDGE_FILE),
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub rag: RagConfig,
    pub ollama: OllamaConfig,
}

impl AppConfig {
    /// Load configuration from environment variables (a `.env` file is honoured)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rag_defaults = RagConfig::default();

        let server = ServerConfig {
            host: lookup("DIGISKILL_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "DIGISKILL_PORT", DEFAULT_PORT)?,
            static_dir: lookup("DIGISKILL_STATIC_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        };

        let rag = RagConfig {
            enabled: parse_bool(&lookup, "RAG_ENABLED", rag_defaults.enabled)?,
            eager_init: parse_bool(&lookup, "RAG_EAGER_INIT", rag_defaults.eager_init)?,
            knowledge_file: lookup("RAG_KNOWLEDGE_FILE")
                .map(PathBuf::from)
                .unwrap_or(rag_defaults.knowledge_file),
            chunk_size: parse_or(&lookup, "RAG_CHUNK_SIZE", rag_defaults.chunk_size)?,
            chunk_overlap: parse_or(&lookup, "RAG_CHUNK_OVERLAP", rag_defaults.chunk_overlap)?,
            top_k: parse_or(&lookup, "RAG_TOP_K", rag_defaults.top_k)?,
        };

        if rag.chunk_overlap > rag.chunk_size {
            return Err(Error::Configuration(format!(
                "RAG_CHUNK_OVERLAP ({}) cannot be larger than RAG_CHUNK_SIZE ({})",
                rag.chunk_overlap, rag.chunk_size
            )));
        }

        Ok(Self {
            server,
            rag,
            ollama: OllamaConfig::from_lookup(lookup)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| Error::Configuration(format!("{} has an invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}

fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(Error::Configuration(format!("{} must be true or false, got '{}'", key, raw))),
        },
        None => Ok(default),
    }
}
