pub mod health;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};

use crate::errors::AppError;
use crate::llm_client::ModelInfo;
use crate::state::AppState;
use crate::{chat, import, tools, translation};

/// GET /api/v1/models
/// Upstream model listing, served through the TTL cache.
async fn handle_list_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelInfo>>, AppError> {
    let models = state.model_cache.get(&state.llm).await.map_err(|e| {
        if e.is_auth() {
            AppError::Unauthorized(e.to_string())
        } else {
            AppError::Llm(format!("Model listing failed: {e}"))
        }
    })?;
    Ok(Json(models))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Import
        .route("/api/v1/resumes/import", post(import::handlers::handle_import))
        // Analysis
        .route(
            "/api/v1/resumes/:id/analyze",
            post(tools::handlers::handle_analyze),
        )
        // Streaming translation
        .route(
            "/api/v1/resumes/:id/translate",
            post(translation::handlers::handle_translate),
        )
        // Chat
        .route("/api/v1/resumes/:id/chat", post(chat::handlers::handle_chat))
        .route(
            "/api/v1/resumes/:id/threads",
            get(chat::handlers::handle_list_threads),
        )
        .route(
            "/api/v1/threads/:id/messages",
            get(chat::handlers::handle_get_messages),
        )
        .route(
            "/api/v1/threads/:id",
            delete(chat::handlers::handle_delete_thread),
        )
        // Models
        .route("/api/v1/models", get(handle_list_models))
        .with_state(state)
}
