//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request envelope (method, path)
//!     → table.rs (scan every entry in order)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: backend address of the last match, or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[] (configuration order preserved)
//!     → Compile matchers (uppercased method, exact path)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always resolves to the same address
//! - Last match wins (later entries override earlier ones)

pub mod matcher;
pub mod table;

pub use table::{Resolution, RouteTable};
