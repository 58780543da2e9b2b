//! The browser form, served with axum.
//!
//! ```text
//! GET  /         upload form
//! POST /convert  multipart form → result page (log + download or failure)
//! GET  /health   {"status":"ok","version":…}
//! ```
//!
//! Requests are independent: each conversion stages its own uniquely named
//! temp files and nothing is shared between requests except the staging
//! directory itself. The download is embedded in the result page as a
//! `data:` URI, so the server keeps no per-request state after responding.

pub mod error;
pub mod form;
pub mod routes;
pub mod templates;

use crate::config::ConverterConfig;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Default bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8501";

/// Default request-body limit (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Runtime configuration for the web form.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP address to bind.
    pub bind_address: String,

    /// Largest accepted request body, uploads included.
    pub max_upload_bytes: usize,

    /// How conversions are run.
    pub converter: ConverterConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            converter: ConverterConfig::default(),
        }
    }
}

/// State shared by all handlers.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
}

/// Build the complete [`Router`] for the application.
pub fn router(config: ServerConfig) -> Router {
    let body_limit = config.max_upload_bytes;
    let state = Arc::new(AppState { config });

    routes::router()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until SIGINT/SIGTERM.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(
        addr = %listener.local_addr()?,
        converter = %config.converter.program,
        "HTTP server listening"
    );

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
