//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with a single catch-all handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Forward every request to the one configured backend
//! - Serve until the shutdown token is triggered
//!
//! # Design Decisions
//! - No route table: one listener maps to exactly one backend address
//! - Handlers share no mutable state; each opens its own backend connection
//! - The overall request timeout sits just above the dispatch deadlines, so
//!   dispatch timeouts surface as their own errors first; if it still fires
//!   the client gets 504

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::HttpConfig;
use crate::dispatch::Dispatch;
use crate::http::request::{
    envelope_from, propagate_request_id_layer, request_span, set_request_id_layer,
};
use crate::http::response;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

const FRONTEND: &str = "http";
const TIMEOUT_HEADROOM: Duration = Duration::from_secs(1);

/// Application state injected into the handler.
pub struct AppState<D> {
    pub process: Arc<str>,
    pub dispatcher: Arc<D>,
}

impl<D> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            process: Arc::clone(&self.process),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

/// HTTP front-end of the bridge.
pub struct HttpServer {
    router: Router,
    config: HttpConfig,
}

impl HttpServer {
    /// Create a new HTTP server forwarding to `config.process` via `dispatcher`.
    pub fn new<D: Dispatch + 'static>(config: HttpConfig, dispatcher: D) -> Self {
        let state = AppState {
            process: Arc::from(config.process.as_str()),
            dispatcher: Arc::new(dispatcher),
        };
        let request_timeout =
            config.timeouts.connect() + config.timeouts.exchange() + TIMEOUT_HEADROOM;

        Self {
            router: build_router(state, request_timeout),
            config,
        }
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.process,
            "HTTP bridge listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP bridge stopped");
        Ok(())
    }
}

fn build_router<D: Dispatch + 'static>(state: AppState<D>, request_timeout: Duration) -> Router {
    Router::new()
        .fallback(bridge_handler::<D>)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(propagate_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::GATEWAY_TIMEOUT,
                    request_timeout,
                )),
        )
}

/// Forward one HTTP request and map the outcome back onto HTTP.
async fn bridge_handler<D: Dispatch + 'static>(
    State(state): State<AppState<D>>,
    method: Method,
    uri: Uri,
) -> Response {
    let start = Instant::now();
    let envelope = envelope_from(&method, &uri);

    tracing::debug!(
        method = %envelope.method,
        path = %envelope.path,
        "Forwarding request"
    );

    let response = match state.dispatcher.dispatch(&state.process, &envelope).await {
        Ok(reply) => response::from_envelope(reply),
        Err(error) => {
            tracing::error!(
                method = %envelope.method,
                path = %envelope.path,
                error = %error,
                "Dispatch failed"
            );
            response::internal_error(error.to_string())
        }
    };

    metrics::record_request(FRONTEND, i64::from(response.status().as_u16()), start);
    response
}
