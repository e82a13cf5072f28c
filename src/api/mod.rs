use anyhow::Result;
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use digiskill_assessment::AssessmentStore;

use crate::chat::ChatService;
use crate::config::AppConfig;

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;

pub struct AppState {
    pub store: AssessmentStore,
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat: Arc<ChatService>) -> Self {
        Self {
            store: AssessmentStore::new(),
            chat,
        }
    }
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let chat = Arc::new(ChatService::from_config(&config));
    if config.rag.enabled && config.rag.eager_init {
        chat.spawn_init();
    }

    let state = Arc::new(AppState::new(chat));
    let app = build_app(state, config.server.static_dir.as_deref());

    let bind_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Digital Skills Assessment API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}

/// The browser UI is served from another origin, so every origin is allowed
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_app(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let mut app = router::routes(state);
    if let Some(dir) = static_dir {
        tracing::info!(dir = %dir.display(), "serving static files");
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}
