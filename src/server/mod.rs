//! Inbound HTTP surface.
//!
//! # Routes
//! - `POST /send-sms`: normalize, forward to the gateway, relay the outcome
//! - `GET /health`: liveness, never touches the gateway
//! - `GET /swagger/`, `/swagger/index.html`, `/swagger/doc.json`: API docs
//!
//! Each request is handled independently; the only shared value is the
//! immutable [`GatewayClient`].

mod docs;
mod error;
mod handlers;

pub use docs::api_document;
pub use error::{
    ERROR_CALLING_GATEWAY, FAILED_TO_CREATE_JSON, FAILED_TO_SEND_MESSAGE, INVALID_NUMBER_FORMAT,
    INVALID_REQUEST_BODY, RelayError,
};
pub use handlers::{API_UP, SMS_SENT};

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::client::GatewayClient;

/// State injected into handlers.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<GatewayClient>,
}

impl AppState {
    pub fn new(gateway: GatewayClient) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

/// Build the router with all routes and the request tracing layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/send-sms", post(handlers::send_sms))
        .route("/health", get(handlers::health))
        .route("/swagger/", get(docs::index))
        .route("/swagger/index.html", get(docs::index))
        .route("/swagger/doc.json", get(docs::doc_json))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl+C (or SIGTERM on Unix) is received.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
