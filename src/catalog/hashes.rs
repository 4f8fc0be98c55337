//! Content-hash extraction from catalog search-result pages.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::compile_static_regex;

/// Length of a catalog content hash in characters.
pub const HASH_LEN: usize = 32;

/// One result anchor; lazy so several anchors on a line stay separate.
static RESULT_ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"<a href='book/index\.php.+?</a>"));

/// A 32-character uppercase hex run, not part of a longer word.
static CONTENT_HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"\b[0-9A-F]{32}\b"));

/// Extracts content hashes from a search-results page, in document order.
///
/// Anchors that do not carry a well-formed hash are skipped. Empty input or
/// a page without result anchors yields an empty vector.
#[must_use]
pub fn extract_hashes(html: &str) -> Vec<String> {
    RESULT_ANCHOR_RE
        .find_iter(html)
        .filter_map(|anchor| {
            let hash = CONTENT_HASH_RE.find(anchor.as_str()).map(|m| m.as_str());
            match hash {
                Some(hash) if hash.len() == HASH_LEN => {
                    debug!(hash, "new hash found");
                    Some(hash.to_string())
                }
                _ => {
                    debug!(anchor = anchor.as_str(), "result anchor without hash");
                    None
                }
            }
        })
        .collect()
}

/// True when `value` has the shape of a content hash.
///
/// Lowercase hex is accepted; the catalog itself is case-insensitive.
#[must_use]
pub fn is_content_hash(value: &str) -> bool {
    value.len() == HASH_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}
