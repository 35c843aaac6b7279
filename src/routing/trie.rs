//! Segment trie holding the route patterns of one HTTP method.
//!
//! # Responsibilities
//! - Store registered patterns, one node per distinct segment under a parent
//! - Find the registered pattern matching a split request path
//!
//! # Design Decisions
//! - Children keep insertion order; search takes the first child that leads
//!   to a registered pattern, so a wildcard registered before a literal
//!   sibling is tried first
//! - A `*` node terminates the search immediately, whatever remains of the path

use crate::routing::pattern::{is_catch_all, is_wild};

/// A node of the pattern trie.
#[derive(Debug, Default, Clone)]
pub struct TrieNode {
    segment: String,
    pattern: String,
    children: Vec<TrieNode>,
    is_wild: bool,
}

impl TrieNode {
    /// Create an empty root node.
    pub fn root() -> Self {
        Self::default()
    }

    fn child(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            pattern: String::new(),
            children: Vec::new(),
            is_wild: is_wild(segment),
        }
    }

    /// The literal segment text of this node (`""` for the root).
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// The full pattern registered at this node, if it terminates a route.
    pub fn pattern(&self) -> Option<&str> {
        if self.pattern.is_empty() {
            None
        } else {
            Some(&self.pattern)
        }
    }

    /// Returns true if this node's segment is a `:` or `*` parameter.
    pub fn is_wild(&self) -> bool {
        self.is_wild
    }

    /// Child nodes in insertion order.
    pub fn children(&self) -> &[TrieNode] {
        &self.children
    }

    /// Insert `pattern`, whose split form is `segments`, below this node.
    pub fn insert(&mut self, pattern: &str, segments: &[&str], depth: usize) {
        if depth == segments.len() {
            self.pattern = pattern.to_string();
            return;
        }

        let segment = segments[depth];
        let index = match self.children.iter().position(|c| c.segment == segment) {
            Some(index) => index,
            None => {
                self.children.push(TrieNode::child(segment));
                self.children.len() - 1
            }
        };
        self.children[index].insert(pattern, segments, depth + 1);
    }

    /// Find the node terminating the route that matches `segments`.
    pub fn search(&self, segments: &[&str], depth: usize) -> Option<&TrieNode> {
        if depth == segments.len() || is_catch_all(&self.segment) {
            return self.pattern().map(|_| self);
        }

        let segment = segments[depth];
        self.children
            .iter()
            .filter(|child| child.is_wild || child.segment == segment)
            .find_map(|child| child.search(segments, depth + 1))
    }
}
