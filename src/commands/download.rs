//! Download command handler: metadata → link resolution → local file.

use std::path::Path;

use anyhow::{Context, Result, bail};
use bookproxy_core::catalog::is_content_hash;
use bookproxy_core::download::ProgressDisplay;
use bookproxy_core::{Book, CatalogClient, FileStreamer, Settings, book_filename};
use tracing::{info, warn};

use crate::cli::DownloadArgs;

pub async fn run_download_command(args: &DownloadArgs, settings: &Settings) -> Result<()> {
    ensure_content_hash(&args.hash)?;

    let catalog = CatalogClient::new(settings.endpoints.clone(), settings.catalog_timeouts)
        .context("Failed to create catalog client")?;
    let book = catalog.lookup(&args.hash).await;
    let output_dir = args.output_dir.as_deref().unwrap_or(&settings.output_dir);
    save_book(&catalog, settings, book, &args.hash, output_dir).await
}

pub(crate) fn ensure_content_hash(hash: &str) -> Result<()> {
    if !is_content_hash(hash) {
        bail!(
            "What: '{hash}' is not a content hash\nWhy: Expected 32 hexadecimal characters\nFix: Copy the hash from `bookproxy search` output."
        );
    }
    Ok(())
}

/// Resolves a download link for `book` if needed and saves it under `output_dir`.
pub(crate) async fn save_book(
    catalog: &CatalogClient,
    settings: &Settings,
    book: Book,
    hash: &str,
    output_dir: &Path,
) -> Result<()> {
    let book = catalog.prepare_download(book, hash).await;
    if book.url.is_empty() {
        bail!("No download link found for {hash}");
    }

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let streamer =
        FileStreamer::new(settings.transfer_timeouts).context("Failed to create transfer client")?;
    let filename = book_filename(&book);
    let saved = streamer
        .stream_to_dir(&book.url, output_dir, &filename, ProgressDisplay::Bar)
        .await
        .with_context(|| format!("Download of {hash} failed"))?;

    match saved {
        Some(saved) => {
            info!(hash, bytes = saved.bytes, "saved book");
            println!("{}", saved.path.display());
        }
        None => {
            warn!(hash, url = %book.url, "file host returned no data; nothing saved");
        }
    }
    Ok(())
}
