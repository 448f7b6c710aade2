//! JSON stream router.
//!
//! # Responsibilities
//! - Decode request envelopes from an input stream
//! - Resolve each request through the route table
//! - Dispatch matched requests, answer unmatched ones with `{404, ""}`
//! - Write and flush each response before reading the next request
//! - Stop on end of input or when shutdown has been requested
//!
//! # Design Decisions
//! - Strictly sequential: responses leave in request order
//! - Shutdown is checked once per iteration, before decoding; it neither
//!   cancels a dispatch in flight nor interrupts a read already waiting
//! - Per-request failures follow the configured `ErrorPolicy`

use std::time::Instant;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::{ErrorPolicy, LimitConfig};
use crate::dispatch::{Dispatch, DispatchError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::protocol::{write_envelope, DecodeError, FrameDecoder, Request, Response};
use crate::routing::{Resolution, RouteTable};

const FRONTEND: &str = "stream";

/// Status emitted for an inbound frame that could not be decoded.
pub const MALFORMED_REQUEST_STATUS: i64 = 400;

/// Errors that end the stream loop.
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("failed to read request stream: {0}")]
    Input(#[source] DecodeError),

    #[error("failed to write response: {0}")]
    Output(#[source] std::io::Error),

    #[error("malformed inbound request: {0}")]
    MalformedRequest(#[source] DecodeError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The input stream ended cleanly.
    EndOfInput,
    /// The input stream ended inside a JSON value.
    TruncatedInput,
    /// Shutdown was requested between requests.
    Interrupt,
}

/// Counters for one run of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub handled: u64,
    pub not_found: u64,
    pub failed: u64,
    pub stopped_by: StopReason,
}

/// The stream router front-end.
pub struct StreamFrontend<D> {
    table: RouteTable,
    dispatcher: D,
    policy: ErrorPolicy,
    shutdown: Shutdown,
    max_request_bytes: usize,
}

impl<D: Dispatch> StreamFrontend<D> {
    pub fn new(table: RouteTable, dispatcher: D, shutdown: Shutdown) -> Self {
        Self {
            table,
            dispatcher,
            policy: ErrorPolicy::default(),
            shutdown,
            max_request_bytes: LimitConfig::default().max_request_bytes,
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_request_bytes(mut self, max_request_bytes: usize) -> Self {
        self.max_request_bytes = max_request_bytes;
        self
    }

    /// Serve requests from `input` until it ends or shutdown is requested.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<RunSummary, FrontendError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut decoder = FrameDecoder::with_limit(input, self.max_request_bytes);
        let mut handled = 0;
        let mut not_found = 0;
        let mut failed = 0;

        let stopped_by = loop {
            if self.shutdown.is_triggered() {
                break StopReason::Interrupt;
            }

            let start = Instant::now();
            let request = match decoder.next::<Request>().await {
                Ok(Some(request)) => request,
                Ok(None) => break StopReason::EndOfInput,
                Err(DecodeError::Truncated { buffered }) => {
                    tracing::warn!(buffered, "Input ended inside a request; stopping");
                    break StopReason::TruncatedInput;
                }
                Err(error) if error.is_frame_error() => {
                    if self.policy == ErrorPolicy::Abort {
                        return Err(FrontendError::MalformedRequest(error));
                    }
                    tracing::warn!(error = %error, "Malformed request skipped");
                    failed += 1;
                    let response = Response::error(MALFORMED_REQUEST_STATUS, "");
                    self.emit(&mut output, &response, start).await?;
                    continue;
                }
                Err(error) => return Err(FrontendError::Input(error)),
            };

            tracing::info!(method = %request.method, path = %request.path, "Request");

            let response = match self.table.resolve_request(&request) {
                Resolution::NoMatch => {
                    tracing::info!(method = %request.method, path = %request.path, "Request discarded: no route");
                    not_found += 1;
                    Response::not_found()
                }
                Resolution::Matched(address) => {
                    match self.dispatcher.dispatch(address, &request).await {
                        Ok(response) => response,
                        Err(error) if self.policy == ErrorPolicy::Abort => return Err(error.into()),
                        Err(error) => {
                            tracing::error!(
                                backend = %address,
                                error = %error,
                                "Dispatch failed; answering with error status"
                            );
                            failed += 1;
                            Response::error(error.status(), "")
                        }
                    }
                }
            };

            self.emit(&mut output, &response, start).await?;
            handled += 1;
        };

        let summary = RunSummary {
            handled,
            not_found,
            failed,
            stopped_by,
        };
        tracing::info!(
            handled,
            not_found,
            failed,
            stopped_by = ?stopped_by,
            "Stream router stopped"
        );
        Ok(summary)
    }

    async fn emit<W>(&self, output: &mut W, response: &Response, start: Instant) -> Result<(), FrontendError>
    where
        W: AsyncWrite + Unpin,
    {
        tracing::info!(status = response.status, body_bytes = response.body.len(), "Response");
        write_envelope(output, response)
            .await
            .map_err(FrontendError::Output)?;
        metrics::record_request(FRONTEND, response.status, start);
        Ok(())
    }
}
