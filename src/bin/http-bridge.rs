//! HTTP bridge.
//!
//! Accepts HTTP/1.1 requests on the configured port and forwards each one, as
//! a `{method, path}` envelope, to a single backend socket. The backend's
//! `{status, body}` becomes the HTTP response.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use dispatch_bridge::config::load_http_config;
use dispatch_bridge::http::HttpServer;
use dispatch_bridge::lifecycle::{signals, startup, Shutdown};

#[derive(Parser)]
#[command(name = "http-bridge")]
#[command(about = "Forward HTTP requests to a backend socket", long_about = None)]
struct Cli {
    /// Path to the JSON configuration (`{"port": ..., "process": ...}`).
    config: PathBuf,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_http_config(&cli.config)?;
    startup::init_observability(&config.observability, cli.log_level.as_deref())?;

    tracing::info!(
        config = %cli.config.display(),
        port = config.port,
        backend = %config.process,
        "http-bridge starting"
    );

    let listener = TcpListener::bind(config.listen_address()).await?;

    let shutdown = Shutdown::new();
    signals::spawn_listener(shutdown.clone())?;

    let dispatcher = startup::build_dispatcher(&config.timeouts, &config.limits);
    let server = HttpServer::new(config, dispatcher);
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
