//! End-to-end chatbot tests against a mock Ollama server
//!
//! The mock embeds text as keyword counts and "generates" by inspecting the
//! retrieval prompt, so these tests cover loading, chunking, embedding,
//! retrieval and prompting through the real HTTP client.

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::{get, post},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tower::ServiceExt;

use digiskill::api::{AppState, build_app};
use digiskill::{AppConfig, ChatService, FALLBACK_RESPONSES, RagStatus};

const KNOWLEDGE: &str = "A strong password is long and unique and mixes letters with numbers and symbols.\n\n\
    Phishing is a scam where attackers send fake emails to trick you into revealing passwords.\n\n\
    A firewall monitors network traffic and blocks unauthorized access to your computer.\n";

const VOCABULARY: [&str; 6] = ["password", "phishing", "email", "firewall", "network", "access"];

fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    let mut vector: Vec<f32> = VOCABULARY.iter().map(|w| lower.matches(w).count() as f32).collect();
    vector.push(0.1);
    vector
}

fn mock_ollama() -> Router {
    Router::new()
        .route(
            "/api/tags",
            get(|| async { Json(json!({"models": [{"name": "llama3:latest"}]})) }),
        )
        .route(
            "/api/embeddings",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["prompt"].as_str().unwrap_or_default();
                Json(json!({"embedding": keyword_vector(prompt)}))
            }),
        )
        .route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["prompt"].as_str().unwrap_or_default();
                let answer = if prompt.contains("fake emails") && prompt.ends_with("Question: What is phishing?\nHelpful Answer:") {
                    "Phishing is a scam that uses fake emails."
                } else {
                    "I don't know."
                };
                Json(json!({"response": format!(" {}\n", answer), "done": true}))
            }),
        )
}

async fn spawn_mock() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, mock_ollama()).await.ok();
    });
    format!("http://{}", addr)
}

fn config(ollama_url: &str, knowledge_file: &str) -> AppConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("OLLAMA_BASE_URL", ollama_url.to_string()),
        ("RAG_KNOWLEDGE_FILE", knowledge_file.to_string()),
        ("RAG_CHUNK_SIZE", "120".to_string()),
        ("RAG_CHUNK_OVERLAP", "20".to_string()),
        ("RAG_TOP_K", "1".to_string()),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn knowledge_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(KNOWLEDGE.as_bytes()).unwrap();
    file
}

async fn post_chat(app: &Router, message: &str) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"message": message, "user_id": "user_1"}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn health(app: &Router) -> Value {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_chat_answers_from_knowledge_file() {
    let base = spawn_mock().await;
    let file = knowledge_file();
    let config = config(&base, file.path().to_str().unwrap());

    let chat = Arc::new(ChatService::from_config(&config));
    let app = build_app(Arc::new(AppState::new(chat)), None);

    assert_eq!(health(&app).await["rag_bot"], "not_available");

    let body = post_chat(&app, "What is phishing?").await;
    assert_eq!(body["response"], "Phishing is a scam that uses fake emails.");
    assert_eq!(health(&app).await["rag_bot"], "initialized");

    let body = post_chat(&app, "How does a firewall help?").await;
    assert_eq!(body["response"], "I don't know.");
}

#[tokio::test]
async fn test_missing_knowledge_file_falls_back() {
    let base = spawn_mock().await;
    let config = config(&base, "/definitely/not/here/info.txt");

    let chat = Arc::new(ChatService::from_config(&config));
    let app = build_app(Arc::new(AppState::new(chat)), None);

    let body = post_chat(&app, "What is phishing?").await;
    assert!(FALLBACK_RESPONSES.contains(&body["response"].as_str().unwrap()));
    assert!(body.get("error").is_none());
    assert_eq!(health(&app).await["rag_bot"], "not_available");
}

#[tokio::test]
async fn test_unreachable_ollama_falls_back() {
    let file = knowledge_file();
    let config = config("http://127.0.0.1:9", file.path().to_str().unwrap());

    let chat = ChatService::from_config(&config);
    let reply = chat.reply("What is phishing?").await.unwrap();
    assert!(FALLBACK_RESPONSES.contains(&reply.as_str()));
}

#[tokio::test]
async fn test_eager_initialization() {
    let base = spawn_mock().await;
    let file = knowledge_file();
    let config = config(&base, file.path().to_str().unwrap());

    let chat = Arc::new(ChatService::from_config(&config));
    chat.spawn_init().await.unwrap();
    assert_eq!(chat.status().await, RagStatus::Initialized);
}

#[tokio::test]
async fn test_disabled_rag_never_contacts_ollama() {
    let file = knowledge_file();
    let mut config = config("http://127.0.0.1:9", file.path().to_str().unwrap());
    config.rag.enabled = false;

    let chat = ChatService::from_config(&config);
    chat.reply("hello").await.unwrap();
    assert_eq!(chat.status().await, RagStatus::NotAvailable);
}
