//! Route handlers.

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::{debug, info, warn};

use super::AppState;
use crate::catalog::{Book, CatalogError, DEFAULT_PAGE, SearchQuery};
use crate::download::{TransferProgress, book_filename, sanitize_filename};

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /v1/search/:query/:res/:page
pub async fn search(
    State(state): State<AppState>,
    Path((query, page_size, page)): Path<(String, String, String)>,
) -> Result<Json<Vec<Book>>, CatalogError> {
    let books = state
        .catalog
        .search(&SearchQuery::new(query, page_size, page))
        .await?;
    Ok(Json(books))
}

/// GET /:query - first page with the configured page size
pub async fn quick_search(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<Book>>, CatalogError> {
    let page_size = state.settings.page_size.to_string();
    let books = state
        .catalog
        .search(&SearchQuery::new(query, page_size, DEFAULT_PAGE))
        .await?;
    Ok(Json(books))
}

/// GET /v1/download/:hash and GET /download/:hash
///
/// Streams the book file through. Every failure before the first byte
/// (unknown hash, unresolvable link, file host error) answers with an empty
/// 200 body; a failure after streaming has started aborts the body.
pub async fn download(State(state): State<AppState>, Path(hash): Path<String>) -> Response {
    let book = state.catalog.lookup(&hash).await;
    let book = state.catalog.prepare_download(book, &hash).await;
    if book.url.is_empty() {
        warn!(hash = %hash, "no download link for book; sending empty response");
        return StatusCode::OK.into_response();
    }

    let filename = book_filename(&book);
    let transfer = match state.streamer.open(&book.url, &filename).await {
        Ok(Some(transfer)) => transfer,
        Ok(None) => return StatusCode::OK.into_response(),
        Err(error) => {
            warn!(hash = %hash, error = %error, "transfer failed to start; sending empty response");
            return StatusCode::OK.into_response();
        }
    };

    debug!(hash = %hash, url = transfer.url(), "transfer opened");
    let (head, upstream) = transfer.into_parts();
    info!(hash = %hash, filename = %head.filename, content_length = ?head.content_length, "streaming book");

    let mut progress = TransferProgress::hidden();
    let url = head.url.clone();
    let body = upstream
        .bytes_stream()
        .inspect_ok(move |chunk| progress.record(chunk.len()))
        .inspect_err(move |error| warn!(url = %url, error = %error, "upstream body failed mid-stream"));

    let mut response = Response::new(Body::from_stream(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    if let Some(length) = head.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }
    headers.insert(
        header::CONTENT_DISPOSITION,
        content_disposition(&head.filename, state.settings.sanitize_filenames),
    );
    response
}

/// `Content-Disposition` value for `filename`.
///
/// Uses `attachment; filename=<name>` when the name is printable ASCII,
/// otherwise an RFC 5987 `filename*` form with an ASCII fallback.
pub(crate) fn content_disposition(filename: &str, sanitize: bool) -> HeaderValue {
    let name = if sanitize {
        sanitize_filename(filename)
    } else {
        filename.to_string()
    };

    // HeaderValue accepts raw non-ASCII bytes, which clients decode inconsistently.
    if name.is_ascii() {
        if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename={name}")) {
            return value;
        }
    }

    let encoded = urlencoding::encode(&name);
    let ascii_fallback: String = name
        .chars()
        .map(|c| {
            if c.is_ascii() && is_unreserved(c as u8) {
                c
            } else {
                '_'
            }
        })
        .collect();

    HeaderValue::from_str(&format!(
        "attachment; filename=\"{ascii_fallback}\"; filename*=UTF-8''{encoded}"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}
