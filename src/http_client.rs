//! Shared HTTP client construction policy.
//!
//! The catalog client and the transfer client are built here so both stay
//! consistent on timeouts, user-agent and compression. Catalog calls are short
//! page fetches; transfers stream whole book files and get a longer budget.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};

/// Default connect timeout for catalog requests (seconds).
pub const CATALOG_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default total timeout for catalog requests (seconds).
pub const CATALOG_READ_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout for file transfers (seconds).
pub const TRANSFER_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default total timeout for file transfers (5 minutes for large files).
pub const TRANSFER_READ_TIMEOUT_SECS: u64 = 300;

/// Connect and total-request timeouts applied to an outbound client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Seconds allowed to establish the TCP/TLS connection.
    pub connect_secs: u64,
    /// Seconds allowed for the whole request, body included.
    pub read_secs: u64,
}

impl HttpTimeouts {
    /// Timeouts for catalog page and metadata requests.
    #[must_use]
    pub const fn catalog() -> Self {
        Self {
            connect_secs: CATALOG_CONNECT_TIMEOUT_SECS,
            read_secs: CATALOG_READ_TIMEOUT_SECS,
        }
    }

    /// Timeouts for book file transfers.
    #[must_use]
    pub const fn transfer() -> Self {
        Self {
            connect_secs: TRANSFER_CONNECT_TIMEOUT_SECS,
            read_secs: TRANSFER_READ_TIMEOUT_SECS,
        }
    }
}

/// Builds an HTTP client with the shared project policy.
///
/// # Errors
///
/// Returns the underlying [`reqwest::Error`] when the TLS backend or proxy
/// configuration cannot be initialized.
pub(crate) fn build_http_client(
    user_agent: impl Into<String>,
    timeouts: HttpTimeouts,
) -> Result<Client, reqwest::Error> {
    let builder = Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.read_secs))
        .user_agent(user_agent.into())
        .gzip(true);
    apply_env_proxy(builder).build()
}

fn apply_env_proxy(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = env_proxy_for_scheme("https")
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = env_proxy_for_scheme("http")
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn env_proxy_for_scheme(scheme: &str) -> Option<String> {
    match scheme {
        "https" => find_first_proxy_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]),
        "http" => find_first_proxy_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]),
        _ => None,
    }
}

fn find_first_proxy_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
