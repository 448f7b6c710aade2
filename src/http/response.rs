//! Response mapping.
//!
//! # Responsibilities
//! - Map a response envelope onto an HTTP response
//! - Build the 500 response for dispatch failures
//!
//! # Design Decisions
//! - Status and body are copied verbatim; no content type is added
//! - Envelope statuses outside the HTTP status range become a 500
//! - Dispatch failures expose the error text to the client; this front-end
//!   is intended for local use behind a trusted caller

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::Response;

use crate::protocol::Response as ResponseEnvelope;

/// Convert a backend envelope into the HTTP response sent to the client.
pub fn from_envelope(envelope: ResponseEnvelope) -> Response {
    match u16::try_from(envelope.status)
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
    {
        Some(status) => raw(status, envelope.body),
        None => internal_error(format!(
            "backend returned invalid HTTP status {}",
            envelope.status
        )),
    }
}

/// A 500 response carrying `description` as its body.
pub fn internal_error(description: String) -> Response {
    raw(StatusCode::INTERNAL_SERVER_ERROR, description)
}

fn raw(status: StatusCode, body: String) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn copies_status_and_body() {
        let response = from_envelope(ResponseEnvelope::new(201, "created"));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get("content-type").is_none());
        assert_eq!(body_text(response).await, "created");
    }

    #[tokio::test]
    async fn accepts_unregistered_codes_in_range() {
        let response = from_envelope(ResponseEnvelope::new(599, ""));
        assert_eq!(response.status().as_u16(), 599);
    }

    #[tokio::test]
    async fn out_of_range_status_becomes_internal_error() {
        let response = from_envelope(ResponseEnvelope::new(1200, "x"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            "backend returned invalid HTTP status 1200"
        );

        let negative = from_envelope(ResponseEnvelope::new(-1, "x"));
        assert_eq!(negative.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
