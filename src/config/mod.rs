//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON, path given on the command line)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig / HttpConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at start-up and never reloaded
//! - Any load failure is fatal; the process does not start
//! - All optional sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_http_config, load_router_config, ConfigError};
pub use schema::{
    ErrorPolicy, HttpConfig, LimitConfig, LogFormat, ObservabilityConfig, RouteConfig,
    RouterConfig, TimeoutConfig,
};
pub use validation::ValidationError;
