//! Byte accounting for a single transfer.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// How a transfer reports progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressDisplay {
    /// Count bytes only (streaming into an HTTP response).
    Hidden,
    /// Draw a console progress bar (saving to a local file).
    Bar,
}

/// Running byte counter for one transfer, with an optional console bar.
///
/// Dropping the counter ends the transfer's accounting; an unfinished bar is
/// abandoned in place so a failed transfer stays visible.
#[derive(Debug)]
pub struct TransferProgress {
    bytes: u64,
    bar: Option<ProgressBar>,
}

impl TransferProgress {
    /// Creates a counter; `content_length` sizes the bar when known.
    #[must_use]
    pub fn new(display: ProgressDisplay, content_length: Option<u64>) -> Self {
        let bar = match display {
            ProgressDisplay::Hidden => None,
            ProgressDisplay::Bar => Some(console_bar(content_length)),
        };
        Self { bytes: 0, bar }
    }

    /// Counter without any display.
    #[must_use]
    pub fn hidden() -> Self {
        Self::new(ProgressDisplay::Hidden, None)
    }

    /// Records `n` more bytes written.
    pub fn record(&mut self, n: usize) {
        let n = n as u64;
        self.bytes = self.bytes.saturating_add(n);
        if let Some(bar) = &self.bar {
            bar.inc(n);
        }
    }

    /// Bytes recorded so far.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Marks the transfer complete.
    pub fn finish(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish();
        }
    }
}

impl Drop for TransferProgress {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar
            && !bar.is_finished()
        {
            bar.abandon();
        }
        debug!(bytes = self.bytes, "transfer accounting closed");
    }
}

fn console_bar(content_length: Option<u64>) -> ProgressBar {
    match content_length {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template(
                    "{bar:40} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        }
        None => {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {bytes} ({bytes_per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner
        }
    }
}
