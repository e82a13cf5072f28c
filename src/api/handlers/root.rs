use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::AppState;

pub async fn home() -> Json<Value> {
    Json(json!({
        "message": "Digital Skills Assessment API is running!",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "rag_bot": state.chat.status().await,
    }))
}
