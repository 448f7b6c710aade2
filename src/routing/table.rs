//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in configuration order
//! - Resolve a method+path pair to a backend address
//! - Return explicit no-match rather than a silent default
//!
//! # Design Decisions
//! - Immutable after construction (shareable without locks)
//! - Full O(n) scan with no short-circuit: the LAST matching entry wins, so
//!   later entries shadow earlier ones for the same method+path

use crate::config::RouteConfig;
use crate::protocol::Request;
use crate::routing::matcher::{AndMatcher, ExactPathMatcher, Matcher, MethodMatcher};

/// Outcome of a route lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Backend address of the last matching entry.
    Matched(&'a str),
    NoMatch,
}

/// A compiled route entry.
#[derive(Debug)]
struct RouteEntry {
    config: RouteConfig,
    matcher: AndMatcher,
}

impl RouteEntry {
    fn compile(config: RouteConfig) -> Self {
        let matcher = AndMatcher::new(vec![
            Box::new(MethodMatcher::new(config.method.clone())),
            Box::new(ExactPathMatcher::new(config.path.clone())),
        ]);
        Self { config, matcher }
    }

    fn process(&self) -> &str {
        &self.config.process
    }

    /// Why this entry is unlikely to serve anything, if it looks wrong.
    fn suspicious(&self) -> Option<&'static str> {
        if self.config.process.is_empty() {
            Some("empty process address; dispatches will fail")
        } else if !is_token(&self.config.method) {
            Some("method is not an HTTP token; only identical stream requests can match")
        } else if self.config.path.is_empty() {
            Some("empty path; HTTP requests never match")
        } else {
            None
        }
    }
}

/// RFC 9110 `token`: one or more tchar.
fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|byte| {
            byte.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&byte)
        })
}

/// Ordered, immutable route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn from_config(routes: Vec<RouteConfig>) -> Self {
        let entries: Vec<RouteEntry> = routes.into_iter().map(RouteEntry::compile).collect();
        for (index, entry) in entries.iter().enumerate() {
            if let Some(reason) = entry.suspicious() {
                tracing::warn!(
                    index,
                    method = %entry.config.method,
                    path = %entry.config.path,
                    process = %entry.config.process,
                    "Route kept as configured: {reason}"
                );
            }
        }
        tracing::debug!(routes = entries.len(), "Route table compiled");
        Self { entries }
    }

    /// Resolve a method and path to a backend address.
    pub fn resolve(&self, method: &str, path: &str) -> Resolution<'_> {
        let mut resolution = Resolution::NoMatch;
        for entry in &self.entries {
            if entry.matcher.matches(method, path) {
                resolution = Resolution::Matched(entry.process());
            }
        }
        resolution
    }

    pub fn resolve_request(&self, request: &Request) -> Resolution<'_> {
        self.resolve(&request.method, &request.path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
