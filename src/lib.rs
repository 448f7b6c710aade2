//! Request-dispatch bridge.
//!
//! Matches inbound `{method, path}` requests against a static route table and
//! forwards them to backend workers over Unix-domain sockets using a JSON
//! envelope protocol. Two front-ends share the dispatch core: a JSON stream
//! router on stdin/stdout and an HTTP bridge.

// Core
pub mod dispatch;
pub mod protocol;
pub mod routing;

// Front-ends
pub mod http;
pub mod stream;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::{HttpConfig, RouterConfig};
pub use dispatch::{Dispatch, DispatchError, UnixDispatcher};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use protocol::{Request, Response};
pub use routing::{Resolution, RouteTable};
pub use stream::StreamFrontend;
