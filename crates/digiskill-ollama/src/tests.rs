//! Tests for the Ollama client against an in-process mock server

#[cfg(test)]
mod mock_server_tests {
    use crate::{EmbeddingProvider, Error, GenerationConfig, LLMProvider, OllamaClient, OllamaConfig};
    use axum::{Json, Router, http::StatusCode, routing::{get, post}};
    use insta::assert_yaml_snapshot;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::time::Duration;

    async fn spawn_mock(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });
        format!("http://{}", addr)
    }

    fn mock_ollama() -> Router {
        Router::new()
            .route(
                "/api/tags",
                get(|| async { Json(json!({"models": [{"name": "llama3:latest"}, {"name": "nomic-embed-text:latest"}]})) }),
            )
            .route(
                "/api/generate",
                post(|Json(body): Json<Value>| async move {
                    let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
                    let num_predict = body["options"]["num_predict"].as_u64().unwrap_or_default();
                    Json(json!({
                        "response": format!("  echo({}): {}  \n", num_predict, prompt),
                        "done": true,
                        "eval_count": 7
                    }))
                }),
            )
            .route(
                "/api/embeddings",
                post(|Json(body): Json<Value>| async move {
                    let prompt = body["prompt"].as_str().unwrap_or_default();
                    if prompt.is_empty() {
                        return Json(json!({"embedding": []}));
                    }
                    Json(json!({"embedding": [prompt.chars().count() as f32, 1.0]}))
                }),
            )
    }

    #[tokio::test]
    async fn test_connect_checks_models() {
        let base = spawn_mock(mock_ollama()).await;

        let mut client = OllamaClient::new(OllamaConfig::new(base.clone(), "llama3")).unwrap();
        client.connect().await.unwrap();
        assert_eq!(client.available_models().len(), 2);

        let mut missing = OllamaClient::new(OllamaConfig::new(base, "mistral")).unwrap();
        let err = missing.connect().await.unwrap_err();
        assert!(matches!(err, Error::LLMProvider(ref m) if m.contains("ollama pull mistral")));
    }

    #[tokio::test]
    async fn test_connect_unreachable_server() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut client = OllamaClient::new(OllamaConfig::new(format!("http://{}", addr), "llama3")).unwrap();
        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_generate_trims_response() {
        let base = spawn_mock(mock_ollama()).await;
        let client = OllamaClient::new(OllamaConfig::new(base, "llama3")).unwrap();

        let result = client.generate("hello").await.unwrap();
        assert_eq!(result.text, "echo(512): hello");
        assert_eq!(result.model_id, "llama3");
        assert_eq!(result.tokens_used, Some(7));

        let config = GenerationConfig {
            model_id: "llama3".to_string(),
            max_tokens: 64,
            ..Default::default()
        };
        let result = client.generate_with_config("short", &config).await.unwrap();
        assert_eq!(result.text, "echo(64): short");
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::NOT_FOUND, "model 'llama3' not found") }),
        );
        let base = spawn_mock(router).await;
        let client = OllamaClient::new(OllamaConfig::new(base, "llama3")).unwrap();

        let err = client.generate("hello").await.unwrap_err();
        match err {
            Error::LLMProvider(message) => {
                assert!(message.contains("404"));
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_slow_generation_times_out() {
        let router = Router::new().route(
            "/api/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({"response": "too late", "done": true}))
            }),
        );
        let base = spawn_mock(router).await;
        let client = OllamaClient::new(OllamaConfig::new(base, "llama3")).unwrap();

        let config = GenerationConfig {
            model_id: "llama3".to_string(),
            timeout: Duration::from_secs(1),
            ..Default::default()
        };
        let err = client.generate_with_config("hello", &config).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_embed_batch_keeps_order() {
        let base = spawn_mock(mock_ollama()).await;
        let client = OllamaClient::new(OllamaConfig::new(base, "llama3")).unwrap();

        let texts = vec!["a".to_string(), "abc".to_string(), "ab".to_string(), "abcd".to_string()];
        let vectors = client.embed_batch(&texts).await.unwrap();
        let lengths: Vec<f32> = vectors.iter().map(|v| v[0]).collect();
        assert_eq!(lengths, vec![1.0, 3.0, 2.0, 4.0]);
    }

    #[tokio::test]
    async fn test_empty_embedding_is_error() {
        let base = spawn_mock(mock_ollama()).await;
        let client = OllamaClient::new(OllamaConfig::new(base, "llama3")).unwrap();

        let err = client.embed("").await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn test_config_snapshot() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("OLLAMA_MODEL", "llama3"),
            ("OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
            ("OLLAMA_TIMEOUT_SECS", "30"),
        ]);
        let config = OllamaConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_yaml_snapshot!(config, @r###"
        base_url: "http://localhost:11434"
        model: llama3
        embedding_model: nomic-embed-text
        timeout_secs: 30
        embed_concurrency: 4
        "###);
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let err = OllamaConfig::from_lookup(|key| {
            (key == "OLLAMA_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_config_rejects_zero_concurrency() {
        for raw in ["0", "-2", "many"] {
            let err = OllamaConfig::from_lookup(|key| {
                (key == "OLLAMA_EMBED_CONCURRENCY").then(|| raw.to_string())
            })
            .unwrap_err();
            assert!(matches!(err, Error::Configuration(ref m) if m.contains("OLLAMA_EMBED_CONCURRENCY")));
        }
    }

    #[test]
    fn test_embedding_model_defaults_to_chat_model() {
        let config = OllamaConfig::from_lookup(|key| {
            (key == "OLLAMA_MODEL").then(|| "phi3".to_string())
        })
        .unwrap();
        assert_eq!(config.embedding_model, "phi3");
        assert_eq!(config.base_url, crate::DEFAULT_BASE_URL);
    }
}
