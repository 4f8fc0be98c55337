//! CLI command handlers.

mod download;
mod search;
mod serve;

pub use download::run_download_command;
pub use search::run_search_command;
pub use serve::run_serve_command;
