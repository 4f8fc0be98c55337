//! Bookproxy Core Library
//!
//! This library turns a free-text query into book records scraped from a
//! third-party catalog, and streams the matching book files either into an
//! HTTP response or onto local disk.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - Search-page scraping, metadata lookup, download-link resolution
//! - [`download`] - Streaming transfers with progress accounting
//! - [`server`] - HTTP routes exposing search and download
//! - [`config`] - File configuration and resolved runtime settings

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod download;
mod http_client;
pub mod server;
mod user_agent;

// Re-export commonly used types
pub use catalog::{Book, BookIndex, CatalogClient, CatalogEndpoints, CatalogError, SearchQuery};
pub use config::{FileConfig, Settings};
pub use download::{FileStreamer, TransferError, TransferProgress, book_filename};
pub use http_client::HttpTimeouts;
