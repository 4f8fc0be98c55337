//! Search pipeline: search page → hashes → metadata records.

use tracing::{debug, error, info, warn};
use url::Url;

use super::{Book, CatalogClient, CatalogError, extract_hashes};

/// Results per page when the caller does not choose.
pub const DEFAULT_PAGE_SIZE: &str = "10";

/// First results page.
pub const DEFAULT_PAGE: &str = "1";

/// A catalog search request.
///
/// Page size and page number are passed through to the catalog verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub page_size: String,
    pub page: String,
}

impl SearchQuery {
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        page_size: impl Into<String>,
        page: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            page_size: page_size.into(),
            page: page.into(),
        }
    }
}

impl CatalogClient {
    /// Builds the search page URL for `query`.
    ///
    /// Parameters are emitted in the order the catalog has always received
    /// them (sorted by name).
    #[must_use]
    pub fn search_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.search_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("column", "def")
            .append_pair("lg_topic", "libgen")
            .append_pair("open", "0")
            .append_pair("page", &query.page)
            .append_pair("phrase", "1")
            .append_pair("req", &query.query)
            .append_pair("res", &query.page_size);
        url
    }

    /// Runs a search and returns one [`Book`] per hash on the results page.
    ///
    /// Metadata is fetched one hash at a time, in page order. A hash whose
    /// lookup degrades to a zero-value book is still included; a hash whose
    /// lookup fails at the transport level is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SearchUnavailable`] if the search page cannot be
    /// fetched, answers with a non-success status, or its body cannot be read.
    /// This error is fatal to the search and is never recovered here.
    #[tracing::instrument(skip(self), fields(query = %query.query))]
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Book>, CatalogError> {
        let url = self.search_url(query);

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(url = %url, error = %e, "search request failed");
                return Err(CatalogError::search_unavailable(url.as_str(), e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!(url = %url, status = status.as_u16(), "search page returned error status");
            return Err(CatalogError::search_unavailable(
                url.as_str(),
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let page = response.text().await.map_err(|e| {
            error!(url = %url, error = %e, "failed to read search page");
            CatalogError::search_unavailable(url.as_str(), e.to_string())
        })?;

        let hashes = extract_hashes(&page);
        debug!(hashes = hashes.len(), "search page parsed");

        let books = self.fetch_books(&hashes).await;
        info!(results = books.len(), "search complete");
        Ok(books)
    }

    /// Fetches metadata for each hash in order.
    pub async fn fetch_books(&self, hashes: &[String]) -> Vec<Book> {
        let mut books = Vec::with_capacity(hashes.len());
        for hash in hashes {
            match self.fetch_metadata(hash).await {
                Ok(book) => books.push(book),
                Err(error) => warn!(hash = %hash, error = %error, "skipping hash after metadata failure"),
            }
        }
        books
    }
}
