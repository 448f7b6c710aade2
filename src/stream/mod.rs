//! Stream router front-end.
//!
//! # Data Flow
//! ```text
//! stdin (stream of JSON request envelopes)
//!     → protocol::FrameDecoder (one value at a time)
//!     → routing::RouteTable (last match wins)
//!     → dispatch::Dispatch (matched) | {404, ""} (no match)
//!     → stdout (one JSON response per request, flushed)
//! ```
//!
//! Logs go to stderr and never mix with the response stream.

pub mod frontend;

pub use frontend::{FrontendError, RunSummary, StopReason, StreamFrontend, MALFORMED_REQUEST_STATUS};
