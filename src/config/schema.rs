//! Configuration schema definitions.
//!
//! Both front-ends read a JSON document. Only `routes` (router) and
//! `port`/`process` (HTTP bridge) are required; every other section has
//! defaults so minimal documents load unchanged.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the stream router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Ordered route table. Later entries shadow earlier ones.
    pub routes: Vec<RouteConfig>,

    /// Backend timeouts.
    pub timeouts: TimeoutConfig,

    /// Frame size limits.
    pub limits: LimitConfig,

    /// What to do when a single request fails.
    pub error_policy: ErrorPolicy,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Root configuration for the HTTP bridge.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// TCP port to listen on.
    pub port: u16,

    /// Backend address every request is forwarded to.
    pub process: String,

    /// Listen address (IP only; the port comes from `port`).
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    #[serde(default)]
    pub limits: LimitConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl HttpConfig {
    pub fn new(port: u16, process: impl Into<String>) -> Self {
        Self {
            port,
            process: process.into(),
            bind: default_bind(),
            timeouts: TimeoutConfig::default(),
            limits: LimitConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    /// `bind:port` as a socket address string.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

/// A single route binding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// HTTP-style method, matched case-insensitively.
    pub method: String,

    /// Request path, matched exactly.
    pub path: String,

    /// Backend socket address (filesystem path).
    pub process: String,
}

impl RouteConfig {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        process: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            process: process.into(),
        }
    }
}

/// Timeouts applied to each backend exchange.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in milliseconds.
    pub connect_ms: u64,

    /// Write-request plus read-response timeout in milliseconds.
    pub exchange_ms: u64,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn exchange(&self) -> Duration {
        Duration::from_millis(self.exchange_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 5_000,
            exchange_ms: 30_000,
        }
    }
}

/// Frame size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Largest inbound request frame on the stream front-end.
    pub max_request_bytes: usize,

    /// Largest response frame accepted from a backend.
    pub max_response_bytes: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_request_bytes: 64 * 1024,
            max_response_bytes: 1024 * 1024,
        }
    }
}

/// Per-request failure policy for the stream router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Turn the failure into an error envelope and keep serving.
    #[default]
    Respond,
    /// Stop the loop on the first failure.
    Abort,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Format of log lines written to stderr.
    pub log_format: LogFormat,

    /// Prometheus exporter bind address; no exporter when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}
