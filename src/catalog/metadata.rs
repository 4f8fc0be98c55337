//! Per-hash metadata lookup.

use serde_json::Value;
use tracing::{debug, warn};

use super::{Book, CatalogClient, CatalogEndpoints, CatalogError};

impl CatalogClient {
    /// Fetches the metadata record for `hash` and decodes it into a [`Book`].
    ///
    /// A non-success status is not an error: it yields a zero-value book, as
    /// does a body that is not a JSON array of objects.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Network`] if the endpoint cannot be reached and
    /// [`CatalogError::Decode`] if the response body cannot be read.
    #[tracing::instrument(skip(self), fields(endpoint = %self.metadata_endpoint))]
    pub async fn fetch_metadata(&self, hash: &str) -> Result<Book, CatalogError> {
        let mut url = self.metadata_endpoint.clone();
        url.query_pairs_mut().append_pair("md5", hash);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "metadata lookup returned no data");
            return Ok(Book::default());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::decode(url.as_str(), e))?;

        Ok(parse_metadata(&body, &self.endpoints))
    }
}

/// Decodes a metadata response body.
///
/// The body is expected to be a JSON array of objects; the first object is
/// decoded with [`Book::from_record`]. Any other shape yields
/// `Book::default()`.
#[must_use]
pub fn parse_metadata(body: &[u8], endpoints: &CatalogEndpoints) -> Book {
    let records: Vec<Value> = match serde_json::from_slice(body) {
        Ok(records) => records,
        Err(error) => {
            debug!(error = %error, "metadata body is not a JSON array");
            return Book::default();
        }
    };

    records
        .first()
        .and_then(Value::as_object)
        .map(|record| Book::from_record(record, endpoints))
        .unwrap_or_default()
}
