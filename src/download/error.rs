//! Error types for the download module.
//!
//! A non-success status from the file host is deliberately not represented
//! here: the streamer reports it as "nothing transferred" rather than failing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while streaming a book file.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before the response headers arrived.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The body stream failed after the transfer had started.
    #[error("transfer of {url} interrupted: {source}")]
    Interrupted {
        /// The URL being streamed.
        url: String,
        /// The underlying stream error.
        #[source]
        source: std::io::Error,
    },

    /// File system error during download (create file, write, rename).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build transfer HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl TransferError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a mid-stream interruption error.
    pub fn interrupted(url: impl Into<String>, source: std::io::Error) -> Self {
        Self::Interrupted {
            url: url.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Wraps a client builder error.
    #[must_use]
    pub fn client(source: reqwest::Error) -> Self {
        Self::Client { source }
    }
}
