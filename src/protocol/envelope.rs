//! Request and response envelopes exchanged with backend workers.

use serde::{Deserialize, Serialize};

/// A request as forwarded to a backend worker.
///
/// `method` keeps the caller's casing; matching against the route table is
/// case-insensitive. `path` is opaque and never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub path: String,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

/// A response produced by a backend worker or synthesized locally.
///
/// `status` mirrors an HTTP status code but is not validated here, so any
/// integer a backend sends survives decoding unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: i64,
    pub body: String,
}

impl Response {
    pub fn new(status: i64, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The response emitted when no route matches: `{404, ""}`.
    pub fn not_found() -> Self {
        Self::new(404, "")
    }

    /// A response synthesized for a request that failed locally.
    pub fn error(status: i64, body: impl Into<String>) -> Self {
        Self::new(status, body)
    }
}
