//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and the optional metrics exporter
//! - Build the backend dispatcher from validated configuration
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration is loaded first, then observability, then listeners

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;

use crate::config::{LimitConfig, ObservabilityConfig, TimeoutConfig};
use crate::dispatch::{DispatchSettings, UnixDispatcher};
use crate::observability::{logging, metrics};

/// Startup failures after configuration has loaded.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("invalid metrics address {address:?}: {source}")]
    MetricsAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Initialize logging (stderr) and, when configured, the metrics exporter.
///
/// Must be called from within a Tokio runtime when metrics are enabled.
pub fn init_observability(
    config: &ObservabilityConfig,
    level_override: Option<&str>,
) -> Result<(), StartupError> {
    logging::init(config, level_override)?;

    if let Some(address) = &config.metrics_address {
        let addr: SocketAddr = address.parse().map_err(|source| StartupError::MetricsAddress {
            address: address.clone(),
            source,
        })?;
        metrics::init_metrics(addr)?;
        tracing::info!(address = %addr, "Metrics exporter listening");
    }

    Ok(())
}

/// Build the production dispatcher.
pub fn build_dispatcher(timeouts: &TimeoutConfig, limits: &LimitConfig) -> UnixDispatcher {
    UnixDispatcher::new(DispatchSettings::from_config(timeouts, limits))
}
