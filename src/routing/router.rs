//! Route registration and lookup.
//!
//! # Responsibilities
//! - Keep one pattern trie per HTTP method
//! - Map `(method, pattern)` to the registered handler
//! - Resolve a request path to its handler and bound path variables
//!
//! # Design Decisions
//! - Built before serving, immutable afterwards (shared without locks)
//! - Generic over the handler type so lookup is testable on its own
//! - Explicit `None` for a miss; choosing the fallback response is the
//!   dispatcher's job

use std::collections::HashMap;

use crate::routing::pattern::{is_catch_all, is_param, split_segments};
use crate::routing::trie::TrieNode;

/// Path variables bound by a route match, keyed by parameter name.
pub type Params = HashMap<String, String>;

/// A successful route lookup.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    /// The pattern the request matched, as it was registered.
    pub pattern: &'a str,
    /// Handler registered for the pattern.
    pub handler: &'a H,
    /// Values captured by `:name` and `*name` segments.
    pub params: Params,
}

/// Per-method pattern tries plus the handler map.
#[derive(Debug)]
pub struct RouteTable<H> {
    roots: HashMap<String, TrieNode>,
    handlers: HashMap<String, H>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self {
            roots: HashMap::new(),
            handlers: HashMap::new(),
        }
    }
}

fn route_key(method: &str, pattern: &str) -> String {
    format!("{}-{}", method, pattern)
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// Registering the same pair again replaces the previous handler.
    pub fn register(&mut self, method: &str, pattern: &str, handler: H) {
        let replaced = self
            .handlers
            .insert(route_key(method, pattern), handler)
            .is_some();

        let segments = split_segments(pattern);
        self.roots
            .entry(method.to_string())
            .or_insert_with(TrieNode::root)
            .insert(pattern, &segments, 0);

        tracing::debug!(method = %method, pattern = %pattern, replaced, "Route registered");
    }

    /// Resolve a request to its route.
    pub fn resolve(&self, method: &str, path: &str) -> Option<RouteMatch<'_, H>> {
        let root = self.roots.get(method)?;
        let search = split_segments(path);
        let node = root.search(&search, 0)?;
        let pattern = node.pattern()?;
        let handler = self.handlers.get(&route_key(method, pattern))?;

        Some(RouteMatch {
            pattern,
            handler,
            params: bind_params(pattern, &search),
        })
    }

    /// Number of registered `(method, pattern)` pairs.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Methods that have at least one route.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }
}

/// Walk the matched pattern against the request segments.
fn bind_params(pattern: &str, search: &[&str]) -> Params {
    let mut params = Params::new();
    for (index, segment) in split_segments(pattern).into_iter().enumerate() {
        if is_param(segment) {
            if let Some(value) = search.get(index) {
                params.insert(segment[1..].to_string(), value.to_string());
            }
        }
        if is_catch_all(segment) && segment.len() > 1 {
            let rest = search.get(index..).unwrap_or_default();
            params.insert(segment[1..].to_string(), rest.join("/"));
            break;
        }
    }
    params
}
