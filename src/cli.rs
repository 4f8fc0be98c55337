//! CLI argument definitions using clap derive macros.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Search a book catalog and fetch book files.
///
/// Bookproxy scrapes the catalog's search page, looks up each result's
/// metadata, and streams book files to disk or through its HTTP service.
#[derive(Parser, Debug)]
#[command(name = "bookproxy")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/bookproxy/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service
    Serve(ServeArgs),
    /// Search the catalog and print the results
    Search(SearchArgs),
    /// Download one book by content hash
    Download(DownloadArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides `listen_addr`)
    #[arg(short, long, value_name = "ADDR")]
    pub listen: Option<SocketAddr>,
}

#[derive(ClapArgs, Debug)]
pub struct SearchArgs {
    /// Search terms (joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Results per page (1-100, overrides `page_size`)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub page_size: Option<u8>,

    /// Results page to fetch
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Print results as JSON instead of a listing
    #[arg(long)]
    pub json: bool,

    /// After searching, download the result with this content hash
    #[arg(short, long, value_name = "HASH")]
    pub download: Option<String>,

    /// Directory for --download (overrides `output_dir`)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct DownloadArgs {
    /// 32-character content hash
    pub hash: String,

    /// Directory to save into (overrides `output_dir`)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl SearchArgs {
    /// The search terms as one query string.
    #[must_use]
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}
