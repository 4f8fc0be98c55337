//! Serve command handler.

use anyhow::{Context, Result};
use bookproxy_core::Settings;
use bookproxy_core::server;

use crate::cli::ServeArgs;

pub async fn run_serve_command(args: &ServeArgs, mut settings: Settings) -> Result<()> {
    if let Some(listen) = args.listen {
        settings.listen_addr = listen;
    }
    let addr = settings.listen_addr;
    server::serve(settings)
        .await
        .with_context(|| format!("HTTP service on {addr} failed"))
}
