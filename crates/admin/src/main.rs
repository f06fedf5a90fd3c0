//! Zhunan CRM admin server.
//!
//! Serves the customer-management API for the Zhunan store on port 8080.
//!
//! # Architecture
//!
//! - Axum web framework
//! - In-memory customer registry, re-seeded with sample records on start
//! - In-memory purifier registry and filter inventory
//! - Credential map in memory or in a JSON file (`CRM_CREDENTIALS_FILE`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zhunan_crm_admin::config::{CrmConfig, LogFormat};
use zhunan_crm_admin::routes;
use zhunan_crm_admin::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = CrmConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zhunan_crm_admin=info,tower_http=debug".into());

    let is_json = config.log_format == LogFormat::Json;
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    // Build application state (seeds customers and default accounts)
    let addr = config.socket_addr();
    let state = AppState::from_config(config).expect("Failed to create application state");

    let app = routes::app(state);

    tracing::info!("{} listening on http://{}", routes::APP_NAME, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
