//! Catalog scraping pipeline.
//!
//! This module turns a free-text query into [`Book`] records by scraping the
//! catalog's HTML search page for content hashes and looking each hash up in
//! the catalog's JSON metadata endpoint. It also resolves keyed download links
//! from the mirror page when a record carries no usable URL.
//!
//! # Architecture
//!
//! - [`extract_hashes`] - Pulls 32-character content hashes out of a results page
//! - [`CatalogClient::fetch_metadata`] - Decodes one metadata record into a [`Book`]
//! - [`CatalogClient::search`] - Search page → hashes → books, strictly sequential
//! - [`CatalogClient::resolve_download_link`] - Best-effort mirror-page link lookup
//! - [`BookIndex`] - Request-scoped hash → [`Book`] lookup built from a result set
//!
//! # Example
//!
//! ```no_run
//! use bookproxy_core::catalog::{CatalogClient, CatalogEndpoints, SearchQuery};
//! use bookproxy_core::HttpTimeouts;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = CatalogClient::new(CatalogEndpoints::default(), HttpTimeouts::catalog())?;
//! let books = catalog.search(&SearchQuery::new("rust", "10", "1")).await?;
//! for book in &books {
//!     println!("{} ({})", book.title, book.content_hash);
//! }
//! # Ok(())
//! # }
//! ```

mod book;
mod error;
mod hashes;
mod index;
mod metadata;
mod resolve;
mod search;

pub use book::Book;
pub use error::CatalogError;
pub use hashes::{HASH_LEN, extract_hashes, is_content_hash};
pub use index::BookIndex;
pub use metadata::parse_metadata;
pub use search::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, SearchQuery};

use regex::Regex;
use reqwest::Client;
use url::Url;

use crate::http_client::{HttpTimeouts, build_http_client};
use crate::user_agent;

/// Catalog search page.
pub const DEFAULT_SEARCH_URL: &str = "http://libgen.io/search.php";

/// Per-hash JSON metadata endpoint.
pub const DEFAULT_METADATA_URL: &str = "http://libgen.io/json.php";

/// Mirror (ad/redirect) page that embeds keyed download links.
pub const DEFAULT_MIRROR_URL: &str = "http://booksdescr.org/ads.php";

/// Host serving the book files themselves.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "http://booksdl.org";

/// Compiles a regex pattern that is known to be valid at build time.
///
/// # Panics
///
/// Panics if the pattern is invalid. Only use with literal patterns.
#[must_use]
#[allow(clippy::panic)]
pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// External endpoints the catalog pipeline talks to.
///
/// The defaults are the live catalog hosts; tests and alternative mirrors
/// override them through configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoints {
    /// Full URL of the HTML search page.
    pub search_url: String,
    /// Full URL of the JSON metadata endpoint.
    pub metadata_url: String,
    /// Full URL of the mirror page used for link resolution.
    pub mirror_url: String,
    /// Scheme and host of the file server, without a trailing path.
    pub download_base_url: String,
}

impl Default for CatalogEndpoints {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            mirror_url: DEFAULT_MIRROR_URL.to_string(),
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
        }
    }
}

impl CatalogEndpoints {
    /// Points every endpoint at one host, keeping the catalog's path layout.
    ///
    /// `search.php`, `json.php`, `ads.php` and `get.php` all live under `base`.
    #[must_use]
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            search_url: format!("{base}/search.php"),
            metadata_url: format!("{base}/json.php"),
            mirror_url: format!("{base}/ads.php"),
            download_base_url: base.to_string(),
        }
    }

    /// Download URL built directly from a content hash.
    #[must_use]
    pub fn download_url(&self, hash: &str) -> String {
        format!(
            "{}/get.php?md5={hash}",
            self.download_base_url.trim_end_matches('/')
        )
    }

    /// Pattern matching keyed download links embedded in the mirror page.
    fn download_link_pattern(&self) -> String {
        format!(
            r"{}/get\.php\?md5=\w{{32}}&key=\w{{16}}",
            regex::escape(self.download_base_url.trim_end_matches('/'))
        )
    }
}

/// HTTP client for the catalog's search, metadata and mirror endpoints.
///
/// Create once and share; the underlying connection pool is reused across
/// requests. Every method issues its outbound calls one at a time.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    endpoints: CatalogEndpoints,
    search_endpoint: Url,
    metadata_endpoint: Url,
    mirror_endpoint: Url,
    link_re: Regex,
}

impl CatalogClient {
    /// Creates a catalog client for the given endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidEndpoint`] if an endpoint is not an
    /// absolute URL, or [`CatalogError::Client`] if the HTTP client cannot be
    /// constructed.
    #[tracing::instrument(level = "debug", skip(endpoints), fields(search = %endpoints.search_url))]
    pub fn new(endpoints: CatalogEndpoints, timeouts: HttpTimeouts) -> Result<Self, CatalogError> {
        let search_endpoint = parse_endpoint(&endpoints.search_url)?;
        let metadata_endpoint = parse_endpoint(&endpoints.metadata_url)?;
        let mirror_endpoint = parse_endpoint(&endpoints.mirror_url)?;
        parse_endpoint(&endpoints.download_base_url)?;

        let link_re = Regex::new(&endpoints.download_link_pattern()).map_err(|e| {
            CatalogError::invalid_endpoint(&endpoints.download_base_url, e.to_string())
        })?;

        let client = build_http_client(user_agent::default_catalog_user_agent(), timeouts)
            .map_err(CatalogError::client)?;

        Ok(Self {
            client,
            endpoints,
            search_endpoint,
            metadata_endpoint,
            mirror_endpoint,
            link_re,
        })
    }

    /// Endpoints this client was built with.
    #[must_use]
    pub fn endpoints(&self) -> &CatalogEndpoints {
        &self.endpoints
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, CatalogError> {
    Url::parse(raw).map_err(|e| CatalogError::invalid_endpoint(raw, e.to_string()))
}
