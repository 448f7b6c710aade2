//! Backend dispatcher over Unix-domain stream sockets.
//!
//! # Responsibilities
//! - Open one connection per request to the backend address
//! - Write the request envelope, then half-close the write direction
//! - Read exactly one response envelope
//! - Close the connection on every exit path
//!
//! # Design Decisions
//! - No pooling, no retries: one connection per request/response exchange
//! - Connect and exchange are each bounded by a deadline
//! - If the socket refuses a write shutdown, the exchange continues and the
//!   backend is expected to stop reading after one complete JSON value
//! - The response is taken from the first complete JSON value; the reader
//!   does not wait for the backend to close its side

use std::future::Future;
use std::io;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::config::{LimitConfig, TimeoutConfig};
use crate::dispatch::error::{DispatchError, Phase};
use crate::observability::metrics;
use crate::protocol::{write_envelope, DecodeError, FrameDecoder, Request, Response};

/// Forwards a request envelope to a backend and returns its response.
pub trait Dispatch: Send + Sync {
    fn dispatch(
        &self,
        address: &str,
        request: &Request,
    ) -> impl Future<Output = Result<Response, DispatchError>> + Send;
}

/// Deadlines and limits for one exchange.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub connect_timeout: Duration,
    pub exchange_timeout: Duration,
    pub max_response_bytes: usize,
}

impl DispatchSettings {
    pub fn from_config(timeouts: &TimeoutConfig, limits: &LimitConfig) -> Self {
        Self {
            connect_timeout: timeouts.connect(),
            exchange_timeout: timeouts.exchange(),
            max_response_bytes: limits.max_response_bytes,
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from_config(&TimeoutConfig::default(), &LimitConfig::default())
    }
}

/// Production dispatcher dialing Unix-domain sockets.
#[derive(Debug, Clone, Default)]
pub struct UnixDispatcher {
    settings: DispatchSettings,
}

impl UnixDispatcher {
    pub fn new(settings: DispatchSettings) -> Self {
        Self { settings }
    }

    async fn exchange(&self, address: &str, request: &Request) -> Result<Response, DispatchError> {
        let stream = timeout(self.settings.connect_timeout, UnixStream::connect(address))
            .await
            .map_err(|_| DispatchError::Timeout {
                address: address.to_string(),
                phase: Phase::Connect,
                after: self.settings.connect_timeout,
            })?
            .map_err(|source| DispatchError::BackendUnavailable {
                address: address.to_string(),
                source,
            })?;

        timeout(
            self.settings.exchange_timeout,
            round_trip(stream, request, self.settings.max_response_bytes),
        )
        .await
        .map_err(|_| DispatchError::Timeout {
            address: address.to_string(),
            phase: Phase::Exchange,
            after: self.settings.exchange_timeout,
        })?
        .map_err(|source| DispatchError::BackendProtocol {
            address: address.to_string(),
            source,
        })
    }
}

impl Dispatch for UnixDispatcher {
    async fn dispatch(&self, address: &str, request: &Request) -> Result<Response, DispatchError> {
        let start = Instant::now();
        let result = self.exchange(address, request).await;

        match &result {
            Ok(response) => {
                tracing::debug!(
                    backend = %address,
                    status = response.status,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Backend responded"
                );
                metrics::record_dispatch(address, "ok", start);
            }
            Err(error) => {
                tracing::warn!(
                    backend = %address,
                    kind = error.kind(),
                    error = %error,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Backend dispatch failed"
                );
                metrics::record_dispatch(address, error.kind(), start);
            }
        }

        result
    }
}

/// One request/response exchange. The stream is dropped, and so closed,
/// when this returns.
async fn round_trip(
    mut stream: UnixStream,
    request: &Request,
    max_response_bytes: usize,
) -> Result<Response, DecodeError> {
    write_envelope(&mut stream, request).await?;

    if let Err(error) = stream.shutdown().await {
        tracing::debug!(
            error = %error,
            "Write half-close rejected; relying on JSON value boundary"
        );
    }

    let mut decoder = FrameDecoder::with_limit(stream, max_response_bytes);
    match decoder.next::<Response>().await? {
        Some(response) => Ok(response),
        None => Err(DecodeError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "backend closed the connection without a response",
        ))),
    }
}
