use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::model_cache::ModelCache;
use crate::llm_client::{Generator, LlmClient};
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Document reads/writes used by the tool executor and translation.
    /// Production: PgStore over `db`. Tests substitute an in-memory store.
    pub store: Arc<dyn DocumentStore>,
    /// Single-shot generation seam. Production: the same `LlmClient`.
    pub generator: Arc<dyn Generator>,
    /// Full client for tool-enabled calls and model listing.
    pub llm: LlmClient,
    pub config: Config,
    /// TTL cache in front of the upstream model listing.
    pub model_cache: Arc<ModelCache>,
}
