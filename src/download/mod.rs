//! Book file transfers.
//!
//! Files are streamed from the file host without buffering the whole body,
//! either into an HTTP response or into a local file.
//!
//! # Example
//!
//! ```no_run
//! use bookproxy_core::HttpTimeouts;
//! use bookproxy_core::download::{FileStreamer, ProgressDisplay};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let streamer = FileStreamer::new(HttpTimeouts::transfer())?;
//! let saved = streamer
//!     .stream_to_dir(
//!         "http://booksdl.org/get.php?md5=0123456789ABCDEF0123456789ABCDEF",
//!         Path::new("./books"),
//!         "Foo (2020 - Bar).pdf",
//!         ProgressDisplay::Bar,
//!     )
//!     .await?;
//! if let Some(saved) = saved {
//!     println!("Saved: {}", saved.path.display());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod filename;
mod progress;
mod streamer;

pub use error::TransferError;
pub use filename::{TEMP_SUFFIX, book_filename, sanitize_filename, temp_filename};
pub use progress::{ProgressDisplay, TransferProgress};
pub use streamer::{FileStreamer, SavedFile, Transfer, TransferHead, copy_to_file};
