//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and echo it on the response
//! - Tag each request's tracing span with that ID
//! - Reduce an HTTP request to a request envelope
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Only method and URL path reach the backend; query string, headers and
//!   body are dropped

use axum::http::{HeaderMap, HeaderName, Method, Request, Uri};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::Span;

use crate::protocol::Request as RequestEnvelope;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that assigns a UUID v4 request ID when the client sent none.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Span for one bridged request. Runs after the request ID is set, so every
/// event logged while handling the request carries the ID.
pub fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request.headers()),
    )
}

/// The request ID header value, or `-` if absent or not visible ASCII.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

/// Build the envelope forwarded to the backend.
pub fn envelope_from(method: &Method, uri: &Uri) -> RequestEnvelope {
    RequestEnvelope::new(method.as_str(), uri.path())
}
