//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, stderr only)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation reading the process's stderr
//!     → Metrics endpoint (Prometheus scrape), when configured
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows through HTTP bridge spans (see `http::request::request_span`)
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
