//! Download-link resolution through the mirror page.

use regex::Regex;
use tracing::{debug, warn};

use super::{Book, CatalogClient};

impl CatalogClient {
    /// Looks up a keyed download link for `book` on the mirror page.
    ///
    /// Resolution is best-effort: on a transport failure, a non-success
    /// status, a missing content hash, or a page without a link, the book is
    /// returned unchanged.
    #[tracing::instrument(skip(self, book), fields(hash = %book.content_hash))]
    pub async fn resolve_download_link(&self, book: Book) -> Book {
        if book.content_hash.is_empty() {
            debug!("book has no content hash; nothing to resolve");
            return book;
        }

        let Some(page) = self.fetch_mirror_page(&book.content_hash).await else {
            return book;
        };

        match find_download_link(&self.link_re, &page) {
            Some(link) => {
                debug!(url = %link, "download link resolved");
                book.with_url(link)
            }
            None => {
                warn!("mirror page has no download link");
                book
            }
        }
    }

    /// Metadata for `hash`, degrading any failure to a zero-value book.
    pub async fn lookup(&self, hash: &str) -> Book {
        match self.fetch_metadata(hash).await {
            Ok(book) => book,
            Err(error) => {
                warn!(hash, error = %error, "metadata lookup failed; continuing with empty record");
                Book::default()
            }
        }
    }

    /// Fills in a download URL from the mirror page when the book has none.
    ///
    /// `hash` is the hash the caller asked for. It stands in for the book's
    /// own hash when metadata came back without one.
    pub async fn prepare_download(&self, mut book: Book, hash: &str) -> Book {
        if !book.url.is_empty() {
            return book;
        }
        if book.content_hash.is_empty() {
            debug!(hash, "record has no hash; resolving with the requested one");
            book.content_hash = hash.to_string();
        }
        self.resolve_download_link(book).await
    }

    async fn fetch_mirror_page(&self, hash: &str) -> Option<String> {
        let mut url = self.mirror_endpoint.clone();
        url.query_pairs_mut().append_pair("md5", hash);

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(url = %url, error = %error, "mirror page request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "mirror page returned error status");
            return None;
        }

        match response.text().await {
            Ok(page) => Some(page),
            Err(error) => {
                warn!(url = %url, error = %error, "failed to read mirror page");
                None
            }
        }
    }
}

/// First download link on the page, if any.
fn find_download_link(link_re: &Regex, page: &str) -> Option<String> {
    link_re.find(page).map(|m| m.as_str().to_string())
}
