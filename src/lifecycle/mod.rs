//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging/metrics → Build dispatcher → Serve
//!
//! Shutdown (shutdown.rs):
//!     Token triggered → serving loop observes it → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown token
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then observability, then listeners
//! - The stream router observes shutdown only between requests; a request
//!   in flight always completes and its response is written
//! - The HTTP bridge stops accepting and drains in-flight requests

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
