//! Stream router.
//!
//! Reads JSON request envelopes from stdin, resolves each against the route
//! table, forwards matches to their backend socket and writes one JSON
//! response per request to stdout. Logs go to stderr.
//!
//! ```text
//!     stdin ──▶ decode ──▶ route table ──▶ backend socket
//!                              │                 │
//!                              ▼ (no match)      ▼
//!     stdout ◀──────────── {404, ""} / backend response
//! ```
//!
//! The loop ends on end of input or after SIGINT/SIGTERM; the signal is only
//! observed between requests.

use std::path::PathBuf;

use clap::Parser;

use dispatch_bridge::config::load_router_config;
use dispatch_bridge::lifecycle::{signals, startup, Shutdown};
use dispatch_bridge::routing::RouteTable;
use dispatch_bridge::stream::StreamFrontend;

#[derive(Parser)]
#[command(name = "dispatch-router")]
#[command(about = "Route a JSON request stream to backend sockets", long_about = None)]
struct Cli {
    /// Path to the JSON route configuration.
    config: PathBuf,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_router_config(&cli.config)?;
    startup::init_observability(&config.observability, cli.log_level.as_deref())?;

    let table = RouteTable::from_config(config.routes);
    tracing::info!(
        config = %cli.config.display(),
        routes = table.len(),
        error_policy = ?config.error_policy,
        "dispatch-router starting"
    );
    if table.is_empty() {
        tracing::warn!("Route table is empty; every request will be answered with 404");
    }

    let shutdown = Shutdown::new();
    signals::spawn_listener(shutdown.clone())?;

    let dispatcher = startup::build_dispatcher(&config.timeouts, &config.limits);
    let frontend = StreamFrontend::new(table, dispatcher, shutdown)
        .with_policy(config.error_policy)
        .with_max_request_bytes(config.limits.max_request_bytes);

    let summary = frontend.run(tokio::io::stdin(), tokio::io::stdout()).await?;

    tracing::info!(stopped_by = ?summary.stopped_by, "Shutdown complete");
    Ok(())
}
