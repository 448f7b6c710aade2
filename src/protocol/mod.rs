//! Backend wire protocol.
//!
//! # Data Flow
//! ```text
//! Request envelope {method, path}
//!     → codec.rs (compact JSON object + '\n')
//!     → backend socket, then half-close of the write direction
//!     ← codec.rs FrameDecoder (first complete JSON value)
//!     ← Response envelope {status, body}
//! ```
//!
//! # Design Decisions
//! - One JSON object per message in each direction, no length prefix
//! - The write half-close marks the end of the request; a peer that cannot
//!   observe it reads until it holds one complete JSON value instead
//! - Readers never wait for end-of-stream once a value is complete
//! - Frames are bounded in size on the read side

pub mod codec;
pub mod envelope;

pub use codec::{encode, write_envelope, DecodeError, FrameDecoder};
pub use envelope::{Request, Response};
