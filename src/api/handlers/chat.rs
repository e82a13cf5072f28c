use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use digiskill_assessment::ChatExchange;

use crate::api::{AppState, extract};
use crate::api::error::ApiResult;

pub const CHAT_ERROR_RESPONSE: &str =
    "I'm sorry, I'm having trouble processing your request right now. Please try again later.";

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    pub message: String,
    #[serde(default = "anonymous")]
    pub user_id: String,
}

fn anonymous() -> String {
    "anonymous".to_string()
}

/// Answer a chat message. Failures still return 200 with an apology so the UI
/// can show it inline.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    extract::Json(message): extract::Json<ChatMessage>,
) -> Json<Value> {
    let outcome = match state.chat.reply(&message.message).await {
        Ok(response) => {
            let exchange = ChatExchange::new(message.message.as_str(), response.as_str());
            let timestamp = exchange.timestamp.clone();
            state
                .store
                .append_chat(&message.user_id, exchange)
                .map(|_| (response, timestamp))
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok((response, timestamp)) => Json(json!({
            "response": response,
            "user_id": message.user_id,
            "timestamp": timestamp,
        })),
        Err(e) => {
            warn!(user_id = %message.user_id, error = %e, "chat request failed");
            Json(json!({
                "response": CHAT_ERROR_RESPONSE,
                "error": e.to_string(),
                "user_id": message.user_id,
            }))
        }
    }
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let history = state.store.chat_history(&user_id)?;
    Ok(Json(json!({ "history": history })))
}
