//! Backend dispatcher tests against real Unix-socket backends.

use std::time::Duration;

use dispatch_bridge::dispatch::{Dispatch, DispatchError, DispatchSettings, Phase, UnixDispatcher};
use dispatch_bridge::protocol::{DecodeError, Request, Response};

mod common;

fn dispatcher_with_exchange_timeout(exchange: Duration) -> UnixDispatcher {
    UnixDispatcher::new(DispatchSettings {
        exchange_timeout: exchange,
        ..DispatchSettings::default()
    })
}

#[tokio::test]
async fn test_round_trip_returns_backend_envelope() {
    let sockets = common::SocketDir::new();
    let backend = sockets.socket("fixed");
    let expected = Response::new(201, "héllo \"world\"\n");
    common::start_fixed_backend(&backend, expected.clone()).await;

    let response = UnixDispatcher::default()
        .dispatch(&backend, &Request::new("POST", "/items"))
        .await
        .unwrap();

    assert_eq!(response, expected);
}

#[tokio::test]
async fn test_request_is_framed_by_half_close() {
    // The echo backend reads to end-of-stream, so it only answers if the
    // dispatcher shut down its write direction.
    let sockets = common::SocketDir::new();
    let backend = sockets.socket("echo");
    common::start_echo_backend(&backend, Duration::ZERO).await;

    let response = dispatcher_with_exchange_timeout(Duration::from_secs(2))
        .dispatch(&backend, &Request::new("get", "/Mixed/Case"))
        .await
        .unwrap();

    assert_eq!(response, Response::new(200, "get /Mixed/Case"));
}

#[tokio::test]
async fn test_response_is_read_without_waiting_for_close() {
    let sockets = common::SocketDir::new();
    let backend = sockets.socket("line");
    common::start_line_backend(&backend, Response::new(200, "early")).await;

    let response = dispatcher_with_exchange_timeout(Duration::from_secs(2))
        .dispatch(&backend, &Request::new("GET", "/"))
        .await
        .unwrap();

    assert_eq!(response, Response::new(200, "early"));
}

#[tokio::test]
async fn test_missing_socket_is_backend_unavailable() {
    let sockets = common::SocketDir::new();
    let backend = sockets.socket("nobody-home");

    let error = UnixDispatcher::default()
        .dispatch(&backend, &Request::new("GET", "/"))
        .await
        .unwrap_err();

    assert!(matches!(error, DispatchError::BackendUnavailable { .. }));
    assert_eq!(error.status(), 502);
    assert_eq!(error.address(), backend);
}

#[tokio::test]
async fn test_malformed_response_is_protocol_error() {
    let sockets = common::SocketDir::new();
    let backend = sockets.socket("garbage");
    common::start_raw_backend(&backend, b"this is not json\n").await;

    let error = UnixDispatcher::default()
        .dispatch(&backend, &Request::new("GET", "/"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        DispatchError::BackendProtocol { source: DecodeError::Syntax(_), .. }
    ));
}

#[tokio::test]
async fn test_close_without_response_is_protocol_error() {
    let sockets = common::SocketDir::new();
    let backend = sockets.socket("mute");
    common::start_raw_backend(&backend, b"").await;

    let error = UnixDispatcher::default()
        .dispatch(&backend, &Request::new("GET", "/"))
        .await
        .unwrap_err();

    assert!(matches!(error, DispatchError::BackendProtocol { source: DecodeError::Io(_), .. }));
}

#[tokio::test]
async fn test_truncated_response_is_protocol_error() {
    let sockets = common::SocketDir::new();
    let backend = sockets.socket("truncated");
    common::start_raw_backend(&backend, b"{\"status\":200,\"bo").await;

    let error = UnixDispatcher::default()
        .dispatch(&backend, &Request::new("GET", "/"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        DispatchError::BackendProtocol { source: DecodeError::Truncated { .. }, .. }
    ));
}

#[tokio::test]
async fn test_response_without_status_is_protocol_error() {
    let sockets = common::SocketDir::new();
    let backend = sockets.socket("shapeless");
    common::start_raw_backend(&backend, b"{\"body\":\"x\"}").await;

    let error = UnixDispatcher::default()
        .dispatch(&backend, &Request::new("GET", "/"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        DispatchError::BackendProtocol { source: DecodeError::Shape(_), .. }
    ));
}

#[tokio::test]
async fn test_silent_backend_times_out() {
    let sockets = common::SocketDir::new();
    let backend = sockets.socket("silent");
    common::start_silent_backend(&backend).await;

    let error = dispatcher_with_exchange_timeout(Duration::from_millis(100))
        .dispatch(&backend, &Request::new("GET", "/"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        DispatchError::Timeout { phase: Phase::Exchange, .. }
    ));
    assert_eq!(error.status(), 504);
}

#[tokio::test]
async fn test_concurrent_dispatches_use_independent_connections() {
    let sockets = common::SocketDir::new();
    let backend = sockets.socket("echo");
    common::start_echo_backend(&backend, Duration::from_millis(50)).await;

    let dispatcher = UnixDispatcher::default();
    let (r1, r2, r3) = (
        Request::new("GET", "/1"),
        Request::new("GET", "/2"),
        Request::new("GET", "/3"),
    );
    let (a, b, c) = tokio::join!(
        dispatcher.dispatch(&backend, &r1),
        dispatcher.dispatch(&backend, &r2),
        dispatcher.dispatch(&backend, &r3),
    );

    assert_eq!(a.unwrap().body, "GET /1");
    assert_eq!(b.unwrap().body, "GET /2");
    assert_eq!(c.unwrap().body, "GET /3");
}
