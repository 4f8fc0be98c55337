//! The [`Book`] record and its decoding from catalog metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::CatalogEndpoints;

/// One catalog entry.
///
/// Serialized with the field names the service has always exposed
/// (`Title`, `Md5`, `Coverurl`, ...). A `Book` is not modified after
/// decoding except for its download URL, which [`Book::with_url`] replaces by
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Book {
    pub title: String,
    pub id: String,
    pub author: String,
    /// Size in bytes as reported by the catalog, unparsed.
    pub filesize: String,
    pub extension: String,
    /// 32-character uppercase hex content hash.
    #[serde(rename = "Md5")]
    pub content_hash: String,
    pub year: String,
    /// Absolute download URL; empty until known.
    pub url: String,
    #[serde(rename = "Coverurl")]
    pub cover_url: String,
    pub language: String,
    pub description: String,
    pub isbn: String,
    pub publisher: String,
}

impl Book {
    /// Builds a book from one metadata record using the fixed key table.
    ///
    /// Unknown keys are ignored. When the record carries `md5`, the download
    /// URL is derived from it immediately.
    #[must_use]
    pub fn from_record(record: &Map<String, Value>, endpoints: &CatalogEndpoints) -> Self {
        let mut book = Self::default();
        for (key, value) in record {
            let Some(text) = field_text(value) else {
                continue;
            };
            match key.as_str() {
                "id" => book.id = text,
                "title" => book.title = text,
                "author" => book.author = text,
                "filesize" => book.filesize = text,
                "extension" => book.extension = text,
                "md5" => {
                    book.url = endpoints.download_url(&text);
                    book.content_hash = text;
                }
                "year" => book.year = text,
                "coverurl" => book.cover_url = text,
                "language" => book.language = text,
                "descr" => book.description = text,
                "identifierwodash" => book.isbn = text,
                "publisher" => book.publisher = text,
                _ => {}
            }
        }
        book
    }

    /// Returns this book with its download URL replaced.
    #[must_use]
    pub fn with_url(self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self
        }
    }

    /// True for the zero-value book produced by a degraded metadata lookup.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Size in bytes when the catalog reported a parseable number.
    #[must_use]
    pub fn filesize_bytes(&self) -> Option<u64> {
        self.filesize.trim().parse().ok()
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
