//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Route every log line to stderr
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - stdout is reserved for protocol data on the stream router
//! - JSON format for machine consumption, pretty format for development
//! - `RUST_LOG` overrides the configured level

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &ObservabilityConfig, level_override: Option<&str>) -> Result<(), TryInitError> {
    let level = level_override.unwrap_or(&config.log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
}

fn default_filter(level: &str) -> String {
    format!(
        "warn,dispatch_bridge={level},dispatch_router={level},http_bridge={level},tower_http={level}"
    )
}
