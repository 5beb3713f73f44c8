// Chatline API - Local Development Server

use std::net::SocketAddr;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use chatline_app::{body_limit_layer, build_cors_layer, build_state, connect_store, create_app};
use chatline_common::Config;
use chatline_llm::LlmConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading any configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    let log_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chatline=debug,tower_http=info,info"));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(log_filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(log_filter)
            .pretty()
            .init();
    }

    info!("Starting Chatline API local development server");

    let llm_config = LlmConfig::from_env().map_err(|e| {
        error!("Failed to load LLM configuration: {}", e);
        e
    })?;

    if llm_config.test_mode {
        warn!("LLM_TEST_MODE is enabled; replies are placeholders and no provider is called");
    }

    info!(llm = ?llm_config, "Configuration loaded successfully");

    let store = connect_store(&config).await.map_err(|e| {
        error!("Failed to open message store: {}", e);
        e
    })?;

    let state = build_state(&config, llm_config, store);

    let app = create_app(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(build_cors_layer(config.cors_allowed_origins.as_deref()))
            .layer(body_limit_layer())
            .into_inner(),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("Server starting on http://{}", addr);
    info!("Health check available at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[mutants::skip] // Waits on OS signals; exercised manually
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
