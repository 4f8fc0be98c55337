//! Error types for the catalog pipeline.

use thiserror::Error;

/// Errors raised while talking to the catalog.
///
/// Only [`CatalogError::SearchUnavailable`] is fatal to a search. Metadata
/// and mirror-page failures are reported to the pipeline, which degrades
/// them to empty or unchanged values.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure reaching a catalog endpoint.
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that could not be reached.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read.
    #[error("failed to read response body from {url}: {source}")]
    Decode {
        /// The URL whose body failed.
        url: String,
        /// The underlying read error.
        #[source]
        source: reqwest::Error,
    },

    /// The search page is unreachable or returned a non-success status.
    #[error("catalog search unavailable at {url}: {reason}")]
    SearchUnavailable {
        /// The search request URL.
        url: String,
        /// Human-readable cause (transport error or HTTP status).
        reason: String,
    },

    /// A configured endpoint is not a usable absolute URL.
    #[error("invalid catalog endpoint {url}: {reason}")]
    InvalidEndpoint {
        /// The offending endpoint string.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build catalog HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl CatalogError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a body-read error.
    pub fn decode(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates a fatal search-unavailable error.
    pub fn search_unavailable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SearchUnavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid-endpoint error.
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a client builder error.
    #[must_use]
    pub fn client(source: reqwest::Error) -> Self {
        Self::Client { source }
    }

    /// Stable machine-readable code used in API error bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network_error",
            Self::Decode { .. } => "decode_error",
            Self::SearchUnavailable { .. } => "search_unavailable",
            Self::InvalidEndpoint { .. } => "invalid_endpoint",
            Self::Client { .. } => "client_error",
        }
    }
}
