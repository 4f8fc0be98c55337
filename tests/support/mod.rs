//! Shared fixtures for integration tests.

#![allow(dead_code)]

use bookproxy_core::{CatalogClient, CatalogEndpoints, HttpTimeouts};
use wiremock::MockServer;

pub const HASH_A: &str = "0123456789ABCDEF0123456789ABCDEF";
pub const HASH_B: &str = "FEDCBA9876543210FEDCBA9876543210";
pub const HASH_C: &str = "AAAAAAAAAAAAAAAABBBBBBBBBBBBBBBB";

/// A search results page with one result anchor per hash.
pub fn results_page(hashes: &[&str]) -> String {
    let rows: String = hashes
        .iter()
        .enumerate()
        .map(|(i, hash)| {
            format!(
                "<tr><td>{i}</td><td><a href='book/index.php?md5={hash}' title='' id={i}>Book {i}</a></td></tr>\n"
            )
        })
        .collect();
    format!("<html><body><table>\n{rows}</table></body></html>")
}

/// A metadata response body with one record.
pub fn metadata_body(hash: &str, title: &str, year: &str, author: &str, extension: &str) -> String {
    serde_json::json!([{
        "id": "1234",
        "title": title,
        "author": author,
        "year": year,
        "filesize": "1000",
        "extension": extension,
        "md5": hash,
        "descr": "A description",
        "identifierwodash": "9781234567890",
        "unknown_key": "ignored"
    }])
    .to_string()
}

/// A metadata record that carries no `md5`, so no download URL is derived.
pub fn metadata_body_without_hash(title: &str, year: &str, author: &str, extension: &str) -> String {
    serde_json::json!([{
        "id": "1234",
        "title": title,
        "author": author,
        "year": year,
        "extension": extension
    }])
    .to_string()
}

/// A mirror page carrying one keyed download link on `server` for `hash`.
pub fn mirror_page(server: &MockServer, hash: &str) -> (String, String) {
    let link = format!("{}/get.php?md5={hash}&key=ABCDEFGH12345678", server.uri());
    let page = format!("<html><body><a href=\"{link}\">GET</a></body></html>");
    (link, page)
}

/// Endpoints that all point at the mock server.
pub fn endpoints_for(server: &MockServer) -> CatalogEndpoints {
    CatalogEndpoints::with_base(&server.uri())
}

pub fn catalog_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(endpoints_for(server), HttpTimeouts::catalog())
        .expect("catalog client should build")
}
