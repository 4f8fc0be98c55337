//! HTTP service exposing catalog search and book downloads.
//!
//! # Routes
//!
//! - `GET /v1/search/:query/:res/:page` - JSON array of books
//! - `GET /:query` - JSON array of books, configured page size, first page
//! - `GET /v1/download/:hash` - streamed book file
//! - `GET /download/:hash` - same as above
//! - `GET /health` - liveness and version

mod error_response;
mod routes;
mod state;

pub use error_response::{ApiError, ErrorDetail, status_for};
pub use state::AppState;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::catalog::CatalogError;
use crate::config::Settings;
use crate::download::TransferError;

/// Errors that stop the service from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Builds the router with all routes and request tracing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .route("/v1/search/:query/:res/:page", get(routes::search))
        .route("/v1/download/:hash", get(routes::download))
        .route("/download/:hash", get(routes::download))
        .route("/:query", get(routes::quick_search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `settings.listen_addr` and serves until the process exits.
///
/// # Errors
///
/// Returns [`ServerError`] if the clients cannot be built, the address cannot
/// be bound, or the accept loop fails.
pub async fn serve(settings: Settings) -> Result<(), ServerError> {
    let addr = settings.listen_addr;
    let state = AppState::from_settings(settings)?;
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!(address = %addr, "bookproxy listening");

    axum::serve(listener, app).await.map_err(ServerError::Serve)?;

    tracing::info!("server stopped");
    Ok(())
}
