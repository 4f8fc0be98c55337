//! Shared User-Agent strings for catalog and transfer HTTP clients.
//!
//! Single source for the project URL and UA format so scraping and download
//! traffic stay consistent and easy to update.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/bookproxy";

/// Default User-Agent for catalog requests (search page, metadata, mirror page).
#[must_use]
pub(crate) fn default_catalog_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("bookproxy/{version} (catalog-client; +{PROJECT_UA_URL})")
}

/// Default User-Agent for book file transfers.
#[must_use]
pub(crate) fn default_transfer_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("bookproxy/{version} (file-transfer; +{PROJECT_UA_URL})")
}
