//! Path prefix matching for route groups.
//!
//! # Design Decisions
//! - Raw string prefix comparison, not segment-aware: `/v1` also covers
//!   `/v10/...`
//! - Case-sensitive
//! - Empty prefix = always matches

/// Matches request paths that start with a fixed prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The prefix this matcher compares against.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` starts with the prefix.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Matcher for a prefix nested below this one.
    pub fn join(&self, prefix: &str) -> Self {
        Self::new(format!("{}{}", self.prefix, prefix))
    }
}
