//! Streaming of book files from the file host to a sink.
//!
//! A transfer is opened first ([`FileStreamer::open`]) so the caller can
//! decide what to do with the response head before any body bytes move. The
//! body then goes either into an HTTP response (see the server module) or into
//! a local file via [`Transfer::save_to`].

use std::io;
use std::path::{Path, PathBuf};

use futures_util::{Stream, StreamExt};
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};
use url::Url;

use super::error::TransferError;
use super::filename::{sanitize_filename, temp_filename};
use super::progress::{ProgressDisplay, TransferProgress};
use crate::http_client::{HttpTimeouts, build_http_client};
use crate::user_agent::default_transfer_user_agent;

/// HTTP client for book file transfers.
#[derive(Debug, Clone)]
pub struct FileStreamer {
    client: Client,
}

/// Response head of an open transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferHead {
    /// URL the body is being read from.
    pub url: String,
    /// Display filename chosen by the caller (not sanitized).
    pub filename: String,
    /// Body length announced by the file host, if any.
    pub content_length: Option<u64>,
}

/// An open transfer whose body has not been read yet.
#[derive(Debug)]
pub struct Transfer {
    head: TransferHead,
    response: reqwest::Response,
}

/// Result of saving a transfer to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Final path of the file.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes: u64,
}

impl FileStreamer {
    /// Creates a streamer with its own transfer client.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Client`] when the HTTP client cannot be built.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, TransferError> {
        let client = build_http_client(default_transfer_user_agent(), timeouts)
            .map_err(TransferError::client)?;
        Ok(Self { client })
    }

    /// Sends the GET for `url` and returns the open transfer.
    ///
    /// A non-success status yields `Ok(None)`: the file host had nothing for
    /// us and no bytes will be written.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InvalidUrl`] for an unparseable URL, and
    /// [`TransferError::Timeout`] or [`TransferError::Network`] when the
    /// request itself fails.
    #[tracing::instrument(skip(self))]
    pub async fn open(&self, url: &str, filename: &str) -> Result<Option<Transfer>, TransferError> {
        let parsed = Url::parse(url).map_err(|_| TransferError::invalid_url(url))?;

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                TransferError::timeout(url)
            } else {
                TransferError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "file host returned error status; nothing to stream");
            return Ok(None);
        }

        let head = TransferHead {
            url: url.to_string(),
            filename: filename.to_string(),
            content_length: response.content_length(),
        };
        debug!(content_length = ?head.content_length, "transfer opened");
        Ok(Some(Transfer { head, response }))
    }

    /// Opens `url` and saves the body under `dir` as `filename` (sanitized).
    ///
    /// Returns `Ok(None)` when the file host answers with a non-success status.
    ///
    /// # Errors
    ///
    /// See [`FileStreamer::open`] and [`Transfer::save_to`].
    pub async fn stream_to_dir(
        &self,
        url: &str,
        dir: &Path,
        filename: &str,
        display: ProgressDisplay,
    ) -> Result<Option<SavedFile>, TransferError> {
        match self.open(url, filename).await? {
            Some(transfer) => transfer.save_to(dir, display).await.map(Some),
            None => Ok(None),
        }
    }
}

impl Transfer {
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.head.filename
    }

    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.head.content_length
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.head.url
    }

    /// Splits the transfer into its head and the raw response, for callers
    /// that forward the body somewhere other than a file.
    #[must_use]
    pub fn into_parts(self) -> (TransferHead, reqwest::Response) {
        (self.head, self.response)
    }

    /// Writes the body to `dir`, naming the file after the sanitized display
    /// filename.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Interrupted`] if the body stream fails and
    /// [`TransferError::Io`] for filesystem failures. The final file never
    /// exists after an error.
    pub async fn save_to(
        self,
        dir: &Path,
        display: ProgressDisplay,
    ) -> Result<SavedFile, TransferError> {
        let (head, response) = self.into_parts();
        let name = sanitize_filename(&head.filename);
        let mut progress = TransferProgress::new(display, head.content_length);
        let body = response.bytes_stream().map(|chunk| chunk.map_err(io::Error::other));
        copy_to_file(&head.url, body, dir, &name, &mut progress).await
    }
}

/// Copies a byte stream into `dir/filename` through a temporary file.
///
/// Bytes go to `<filename>.tmp` first; the temp file is renamed into place
/// only after the stream ends and the data is synced. On any failure the temp
/// file is removed and the final path is left untouched.
///
/// # Errors
///
/// Returns [`TransferError::Interrupted`] when the stream yields an error and
/// [`TransferError::Io`] when creating, writing or renaming the file fails.
pub async fn copy_to_file<S, B>(
    url: &str,
    stream: S,
    dir: &Path,
    filename: &str,
    progress: &mut TransferProgress,
) -> Result<SavedFile, TransferError>
where
    S: Stream<Item = io::Result<B>>,
    B: AsRef<[u8]>,
{
    let final_path = dir.join(filename);
    let temp_path = dir.join(temp_filename(filename));

    let file = File::create(&temp_path)
        .await
        .map_err(|e| TransferError::io(temp_path.clone(), e))?;

    let written = write_stream(file, stream, url, &temp_path, progress).await;
    if let Err(error) = written {
        debug!(path = %temp_path.display(), "cleaning up temp file after error");
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(error);
    }

    if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(TransferError::io(final_path, e));
    }

    progress.finish();
    info!(path = %final_path.display(), bytes = progress.bytes(), "download complete");

    Ok(SavedFile {
        path: final_path,
        bytes: progress.bytes(),
    })
}

async fn write_stream<S, B>(
    file: File,
    stream: S,
    url: &str,
    path: &Path,
    progress: &mut TransferProgress,
) -> Result<(), TransferError>
where
    S: Stream<Item = io::Result<B>>,
    B: AsRef<[u8]>,
{
    let mut writer = BufWriter::new(file);
    let mut stream = std::pin::pin!(stream);

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| TransferError::interrupted(url, e))?;
        let bytes = chunk.as_ref();

        writer
            .write_all(bytes)
            .await
            .map_err(|e| TransferError::io(path.to_path_buf(), e))?;

        progress.record(bytes.len());
    }

    writer
        .flush()
        .await
        .map_err(|e| TransferError::io(path.to_path_buf(), e))?;
    writer
        .get_ref()
        .sync_all()
        .await
        .map_err(|e| TransferError::io(path.to_path_buf(), e))?;

    Ok(())
}
