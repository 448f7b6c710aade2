//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dispatch_bridge::dispatch::{Dispatch, DispatchError};
use dispatch_bridge::protocol::{Request, Response};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

/// Temporary directory holding the backend sockets of one test.
pub struct SocketDir {
    dir: tempfile::TempDir,
}

impl SocketDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn socket(&self, name: &str) -> String {
        self.dir
            .path()
            .join(format!("{name}.sock"))
            .to_string_lossy()
            .into_owned()
    }
}

/// Start a backend that reads the request until the write half-close,
/// replies with `f(request)` and closes.
pub async fn start_backend<F, Fut>(path: &str, f: F)
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let listener = UnixListener::bind(path).unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut input = Vec::new();
                        if socket.read_to_end(&mut input).await.is_err() {
                            return;
                        }
                        let Ok(request) = serde_json::from_slice::<Request>(&input) else {
                            return;
                        };
                        let response = f(request).await;
                        let mut bytes = serde_json::to_vec(&response).unwrap();
                        bytes.push(b'\n');
                        let _ = socket.write_all(&bytes).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a backend that always answers `response`.
pub async fn start_fixed_backend(path: &str, response: Response) {
    start_backend(path, move |_| {
        let response = response.clone();
        async move { response }
    })
    .await;
}

/// Start a backend that answers `"<method> <path>"` with status 200 after `delay`.
pub async fn start_echo_backend(path: &str, delay: Duration) {
    start_backend(path, move |request| async move {
        tokio::time::sleep(delay).await;
        Response::new(200, format!("{} {}", request.method, request.path))
    })
    .await;
}

/// Start a backend that writes `reply` verbatim after reading the request.
pub async fn start_raw_backend(path: &str, reply: &'static [u8]) {
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut input = Vec::new();
                let _ = socket.read_to_end(&mut input).await;
                let _ = socket.write_all(reply).await;
            });
        }
    });
}

/// Start a backend that reads one line, answers, and then keeps the
/// connection open without closing it.
pub async fn start_line_backend(path: &str, response: Response) {
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let response = response.clone();
            tokio::spawn(async move {
                let mut reader = BufReader::new(socket);
                let mut line = String::new();
                if reader.read_line(&mut line).await.is_err() {
                    return;
                }
                let mut bytes = serde_json::to_vec(&response).unwrap();
                bytes.push(b'\n');
                let _ = reader.get_mut().write_all(&bytes).await;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend(path: &str) {
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _held = socket;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });
}

/// Dispatcher that records every call and answers with the address as body.
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    calls: Arc<Mutex<Vec<(String, Request)>>>,
}

impl RecordingDispatcher {
    pub fn calls(&self) -> Vec<(String, Request)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Dispatch for RecordingDispatcher {
    async fn dispatch(&self, address: &str, request: &Request) -> Result<Response, DispatchError> {
        self.calls
            .lock()
            .unwrap()
            .push((address.to_string(), request.clone()));
        Ok(Response::new(200, address))
    }
}

/// Parse every JSON response written to an output buffer.
pub fn parse_responses(output: &[u8]) -> Vec<Response> {
    serde_json::Deserializer::from_slice(output)
        .into_iter::<Response>()
        .map(Result::unwrap)
        .collect()
}
