//! Search command handler: run the pipeline, print results, optionally save one.

use anyhow::{Context, Result};
use bookproxy_core::{Book, BookIndex, CatalogClient, Settings, SearchQuery};
use indicatif::DecimalBytes;
use tracing::debug;

use super::download::{ensure_content_hash, save_book};
use crate::cli::SearchArgs;

const TITLE_WIDTH: usize = 60;
const AUTHOR_WIDTH: usize = 25;
const RULE_WIDTH: usize = 80;

pub async fn run_search_command(args: &SearchArgs, settings: &Settings) -> Result<()> {
    if let Some(hash) = args.download.as_deref() {
        ensure_content_hash(hash)?;
    }

    let catalog = CatalogClient::new(settings.endpoints.clone(), settings.catalog_timeouts)
        .context("Failed to create catalog client")?;

    let page_size = args.page_size.unwrap_or(settings.page_size);
    let query = SearchQuery::new(args.query_text(), page_size.to_string(), args.page.to_string());
    let books = catalog
        .search(&query)
        .await
        .with_context(|| format!("Search for '{}' failed", query.query))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&books)?);
    } else if books.is_empty() {
        println!("No results for '{}'.", query.query);
    } else {
        for book in &books {
            println!("{}", render_listing_row(book));
        }
    }

    let Some(hash) = args.download.as_deref() else {
        return Ok(());
    };

    let index: BookIndex = books.into_iter().collect();
    debug!(indexed = index.len(), "indexed search results");
    let book = match index.get(hash) {
        Some(book) => book.clone(),
        None => {
            debug!(hash, "hash not in result set; fetching metadata");
            catalog.lookup(hash).await
        }
    };
    let output_dir = args.output_dir.as_deref().unwrap_or(&settings.output_dir);
    save_book(&catalog, settings, book, hash, output_dir).await
}

/// One listing entry: a rule, the id and wrapped title, then a details line.
pub(crate) fn render_listing_row(book: &Book) -> String {
    let heading = format!("{:>5} {}", book.id, book.title);
    let size = human_bytes(book.filesize_bytes().unwrap_or(0));
    format!(
        "{}\n{}\n    ++ @author {:<25} @year {:>4} @size {:>6} @type {:>4}",
        "-".repeat(RULE_WIDTH),
        wrap_title(&heading, TITLE_WIDTH),
        truncate_chars(&book.author, AUTHOR_WIDTH),
        book.year,
        size,
        book.extension,
    )
}

/// Greedy word wrap; a single word longer than `width` gets its own line.
pub(crate) fn wrap_title(title: &str, width: usize) -> String {
    let title = title.trim_end();
    if title.chars().count() <= width {
        return title.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in title.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Decimal (SI) size, e.g. `82.00 kB`, `1.23 MB`.
pub(crate) fn human_bytes(bytes: u64) -> String {
    DecimalBytes(bytes).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_title_short_is_unchanged() {
        assert_eq!(wrap_title("  42 Short title", 60), "  42 Short title");
    }

    #[test]
    fn test_wrap_title_long_splits_on_words() {
        let title = "The Rust Programming Language covering ownership borrowing lifetimes and fearless concurrency";
        let wrapped = wrap_title(title, 60);
        assert!(wrapped.contains('\n'));
        for line in wrapped.lines() {
            assert!(line.chars().count() <= 60, "line too long: {line}");
        }
        assert_eq!(wrapped.replace('\n', " "), title);
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("Фёдор Михайлович Достоевский", 5), "Фёдор");
        assert_eq!(truncate_chars("Short", 25), "Short");
    }

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(999), "999 B");
        assert_eq!(human_bytes(82_000), "82.00 kB");
        assert_eq!(human_bytes(1_234_567), "1.23 MB");
        assert_eq!(human_bytes(3_000_000_000), "3.00 GB");
    }

    #[test]
    fn test_render_listing_row() {
        let book = Book {
            id: "42".to_string(),
            title: "Foo".to_string(),
            author: "An Author With A Remarkably Long Name".to_string(),
            year: "2020".to_string(),
            filesize: "1234567".to_string(),
            extension: "pdf".to_string(),
            ..Book::default()
        };
        let row = render_listing_row(&book);
        let lines: Vec<&str> = row.lines().collect();
        assert_eq!(lines[0], "-".repeat(80));
        assert_eq!(lines[1], "   42 Foo");
        assert!(lines[2].contains("@author An Author With A Remarkab "));
        assert!(lines[2].contains("@year 2020"));
        assert!(lines[2].contains("@size 1.23 MB"));
        assert!(lines[2].contains("@type  pdf"));
    }
}
