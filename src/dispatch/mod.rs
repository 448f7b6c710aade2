//! Backend dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! (backend address, request envelope)
//!     → client.rs (connect with deadline)
//!     → protocol::codec (write request, half-close)
//!     → protocol::codec (decode one response)
//!     → Result<Response, DispatchError>
//! ```
//!
//! # Design Decisions
//! - The `Dispatch` trait is the only seam between front-ends and sockets
//! - Errors are values; each front-end decides how to surface them
//! - Unavailable and protocol failures map to 502, timeouts to 504

pub mod client;
pub mod error;

pub use client::{Dispatch, DispatchSettings, UnixDispatcher};
pub use error::{DispatchError, Phase};
