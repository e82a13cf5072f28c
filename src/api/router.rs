use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use super::AppState;
use super::handlers;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root::home))
        .route("/health", get(handlers::root::health))
        // Profiles
        .route("/profile", post(handlers::profile::save))
        .route("/users/{user_id}/profile", get(handlers::profile::get))
        // Quiz
        .route("/quiz/questions", get(handlers::quiz::questions))
        .route("/quiz/questions/{language}", get(handlers::quiz::questions_by_language))
        .route("/quiz/submit", post(handlers::quiz::submit))
        .route("/quiz/results/{user_id}", get(handlers::quiz::results))
        // Chatbot
        .route("/chat", post(handlers::chat::chat))
        .route("/chat/history/{user_id}", get(handlers::chat::history))
        .with_state(state)
}
