//! Filename construction and sanitization for book transfers.

use std::path::{Component, Path};

use crate::catalog::Book;

/// Suffix of the staging file written during a local transfer.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Builds the display filename for a book: `<title> (<year> - <author>).<extension>`.
///
/// The name is returned verbatim; use [`sanitize_filename`] before it touches
/// the filesystem.
#[must_use]
pub fn book_filename(book: &Book) -> String {
    format!(
        "{} ({} - {}).{}",
        book.title, book.year, book.author, book.extension
    )
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            // Also handle null and control characters
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

/// Name of the staging file for `filename`.
#[must_use]
pub fn temp_filename(filename: &str) -> String {
    format!("{filename}{TEMP_SUFFIX}")
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
