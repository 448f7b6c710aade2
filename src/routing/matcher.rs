//! Route matching logic.
//!
//! # Responsibilities
//! - Match request method (case-insensitive)
//! - Match request path (exact, case-sensitive)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Method comparison uppercases both sides
//! - Paths are opaque: no normalization, no wildcards, no prefixes

use std::fmt;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if a request with this method and path matches.
    fn matches(&self, method: &str, path: &str) -> bool;
}

/// Matches the request method.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    expected_method: String,
}

impl MethodMatcher {
    /// The method is normalized to uppercase once, at construction.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            expected_method: method.into().to_uppercase(),
        }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, method: &str, _path: &str) -> bool {
        method.to_uppercase() == self.expected_method
    }
}

/// Matches the request path by byte equality.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, _method: &str, path: &str) -> bool {
        path == self.path
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, method: &str, path: &str) -> bool {
        self.matchers.iter().all(|m| m.matches(method, path))
    }
}
