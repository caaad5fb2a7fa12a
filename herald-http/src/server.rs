//! HTTP server wiring and graceful shutdown.

use std::{io, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use herald_campaign::CampaignDispatcher;
use herald_common::{Signal, internal};
use serde::Deserialize;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::routes;

/// Configuration for the HTTP listener.
#[derive(Clone, Debug, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Errors that can occur while serving the API.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind the listener to the configured address.
    #[error("Failed to bind listener to {address}: {source}")]
    BindFailed {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server loop failed.
    #[error("Server error: {0}")]
    Serve(#[from] io::Error),
}

/// Shared state handed to every route handler.
pub struct AppState {
    pub dispatcher: Arc<CampaignDispatcher>,
    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn new(dispatcher: Arc<CampaignDispatcher>) -> Self {
        Self {
            dispatcher,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Build the API router.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .route("/api/campaigns/single", post(routes::submit_single))
        .route("/api/campaigns/bulk", post(routes::submit_bulk))
        .route("/api/campaigns", get(routes::list_campaigns))
        .route(
            "/api/campaigns/{id}",
            get(routes::campaign_status).delete(routes::cancel_campaign),
        )
        .route("/api/transport/test", post(routes::test_transport))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until a shutdown signal arrives.
///
/// # Errors
/// Returns an error if the listener cannot bind or the server loop fails
pub async fn serve(
    config: &HttpConfig,
    dispatcher: Arc<CampaignDispatcher>,
    mut shutdown: tokio::sync::broadcast::Receiver<Signal>,
) -> Result<(), ServerError> {
    let address = config.address();
    let listener =
        tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::BindFailed {
                address: address.clone(),
                source,
            })?;

    internal!(level = INFO, "HTTP API listening on {address}");

    let state = Arc::new(AppState::new(dispatcher));

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            match shutdown.recv().await {
                Ok(Signal::Shutdown | Signal::Finalised) | Err(_) => {
                    internal!(level = INFO, "HTTP API shutting down");
                }
            }
        })
        .await?;

    Ok(())
}
