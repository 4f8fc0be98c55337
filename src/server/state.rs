//! Application state for the HTTP service

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::Settings;
use crate::download::FileStreamer;

use super::ServerError;

/// Shared state handed to every route handler.
///
/// Holds only immutable clients and settings; cloning is an `Arc` bump.
/// Nothing learned while serving one request is visible to another.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub streamer: Arc<FileStreamer>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(catalog: CatalogClient, streamer: FileStreamer, settings: Settings) -> Self {
        Self {
            catalog: Arc::new(catalog),
            streamer: Arc::new(streamer),
            settings: Arc::new(settings),
        }
    }

    /// Builds both HTTP clients from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if an endpoint is invalid or a client cannot be
    /// constructed.
    pub fn from_settings(settings: Settings) -> Result<Self, ServerError> {
        let catalog = CatalogClient::new(settings.endpoints.clone(), settings.catalog_timeouts)?;
        let streamer = FileStreamer::new(settings.transfer_timeouts)?;
        Ok(Self::new(catalog, streamer, settings))
    }
}
