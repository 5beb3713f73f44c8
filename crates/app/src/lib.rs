//! Chatline application composition root
//!
//! Wires the conversation store, the completion orchestrator and the
//! Conversations domain router into a single application.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use chatline_common::{db, Config};
use chatline_conversations::{
    CompletionOrchestrator, ConversationService, ConversationsState, InMemoryMessageStore,
    MessageRepository, MessageStore,
};
use chatline_llm::LlmConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Open the conversation store selected by configuration.
///
/// Without `DATABASE_URL` the log lives in memory and is lost on restart.
pub async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn MessageStore>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; using in-memory message store (not durable)");
        return Ok(Arc::new(InMemoryMessageStore::new()));
    };

    let pool = db::connect(database_url, config.database_max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;

    tracing::info!("Database connection established");

    if config.run_migrations {
        db::migrate(&pool)
            .await
            .map_err(|e| anyhow::anyhow!("Database migration failed: {}", e))?;
    }

    Ok(Arc::new(MessageRepository::new(pool)))
}

/// Build the Conversations domain state
pub fn build_state(
    config: &Config,
    llm_config: LlmConfig,
    store: Arc<dyn MessageStore>,
) -> ConversationsState {
    let orchestrator = CompletionOrchestrator::from_config(llm_config);
    let chat = ConversationService::new(store, Arc::new(orchestrator), config.context_window);
    ConversationsState::new(chat)
}

/// Create the main application router with all routes
pub fn create_app(state: ConversationsState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Chatline API v0.0.1-SNAPSHOT" }),
        )
        .merge(chatline_conversations::routes().with_state(state))
}

/// CORS policy: the listed origins, or permissive when none are configured
pub fn build_cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let Some(raw) = allowed_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Request body size limit
pub fn body_limit_layer() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
