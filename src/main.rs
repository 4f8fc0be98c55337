//! CLI entry point for bookproxy.

use anyhow::Result;
use bookproxy_core::Settings;
use bookproxy_core::config::{VerbositySetting, load_config};
use clap::Parser;
use tracing::debug;

mod cli;
mod commands;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let loaded = load_config(args.config.as_deref())?;
    let settings = Settings::from_file_config(loaded.config.as_ref());

    init_tracing(&args, settings.verbosity);

    debug!(
        ?args,
        config_path = ?loaded.path,
        loaded_from_file = loaded.loaded_from_file,
        verbosity = settings.verbosity.as_str(),
        "CLI arguments parsed"
    );

    match &args.command {
        Command::Serve(serve_args) => commands::run_serve_command(serve_args, settings).await,
        Command::Search(search_args) => commands::run_search_command(search_args, &settings).await,
        Command::Download(download_args) => {
            commands::run_download_command(download_args, &settings).await
        }
    }
}

// Priority: RUST_LOG env var > quiet flag > verbose flag > config verbosity > info
fn init_tracing(args: &Args, configured: VerbositySetting) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => configured.filter_directive(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
