//! Dispatch error taxonomy.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::protocol::DecodeError;

/// Stage of a backend exchange that hit its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    Exchange,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Connect => f.write_str("connect"),
            Phase::Exchange => f.write_str("exchange"),
        }
    }
}

/// Failure of a single backend exchange.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No connection could be opened to the backend address.
    #[error("backend {address} unavailable: {source}")]
    BackendUnavailable {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The connection failed or the backend sent something other than one
    /// complete response envelope.
    #[error("backend {address} protocol error: {source}")]
    BackendProtocol {
        address: String,
        #[source]
        source: DecodeError,
    },

    /// The backend did not complete a phase in time.
    #[error("backend {address} timed out during {phase} after {after:?}")]
    Timeout {
        address: String,
        phase: Phase,
        after: Duration,
    },
}

impl DispatchError {
    /// Status of the error envelope a front-end emits for this failure.
    pub fn status(&self) -> i64 {
        match self {
            DispatchError::BackendUnavailable { .. } | DispatchError::BackendProtocol { .. } => 502,
            DispatchError::Timeout { .. } => 504,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::BackendUnavailable { .. } => "unavailable",
            DispatchError::BackendProtocol { .. } => "protocol",
            DispatchError::Timeout { .. } => "timeout",
        }
    }

    pub fn address(&self) -> &str {
        match self {
            DispatchError::BackendUnavailable { address, .. }
            | DispatchError::BackendProtocol { address, .. }
            | DispatchError::Timeout { address, .. } => address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_gateway_statuses() {
        let unavailable = DispatchError::BackendUnavailable {
            address: "/tmp/a.sock".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let timeout = DispatchError::Timeout {
            address: "/tmp/a.sock".into(),
            phase: Phase::Exchange,
            after: Duration::from_millis(50),
        };

        assert_eq!(unavailable.status(), 502);
        assert_eq!(unavailable.kind(), "unavailable");
        assert_eq!(timeout.status(), 504);
        assert_eq!(
            timeout.to_string(),
            "backend /tmp/a.sock timed out during exchange after 50ms"
        );
    }
}
