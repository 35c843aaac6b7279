//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (before serving):
//!     (method, pattern, handler)
//!     → pattern.rs (split into segments, stop after `*`)
//!     → trie.rs (insert into the method's trie)
//!     → router.rs (handler stored under "METHOD-pattern")
//!
//! Incoming request (method, path):
//!     → router.rs (pick the method's trie)
//!     → trie.rs (search, first matching child wins)
//!     → router.rs (bind `:name` / `*name` variables)
//!     → Return: RouteMatch or None
//!
//! Group middleware selection:
//!     → matcher.rs (raw path prefix)
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex in the hot path
//! - Deterministic: same input always matches same route
//! - Sibling precedence is registration order, not specificity

pub mod matcher;
pub mod pattern;
pub mod router;
pub mod trie;

pub use matcher::PathPrefixMatcher;
pub use router::{Params, RouteMatch, RouteTable};
pub use trie::TrieNode;
