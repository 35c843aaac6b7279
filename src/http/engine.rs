//! Route and middleware registration.
//!
//! # Responsibilities
//! - Own the route table while it is being built
//! - Record route groups (prefix + middleware) in creation order
//! - Freeze everything into a [`Dispatcher`] before serving
//!
//! # Design Decisions
//! - Each engine owns its routes; engines never share state
//! - Groups are flat: a nested group copies its parent's prefix, not its
//!   middleware. Nesting still works because the parent's prefix matches
//!   every path the child's does
//! - Group middleware order = group creation order

use std::path::PathBuf;

use axum::http::Method;

use crate::http::chain::{boxed, BoxedHandler, Handler};
use crate::http::dispatcher::{Dispatcher, GroupMiddleware};
use crate::http::middleware::{Logger, Recovery};
use crate::http::static_files::{StaticFiles, FILEPATH_PARAM};
use crate::routing::{PathPrefixMatcher, RouteTable};

/// Builder for the routing state of one server.
pub struct Engine {
    table: RouteTable<BoxedHandler>,
    groups: Vec<GroupMiddleware>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with an empty root group.
    pub fn new() -> Self {
        Self {
            table: RouteTable::new(),
            groups: vec![GroupMiddleware {
                matcher: PathPrefixMatcher::default(),
                handlers: Vec::new(),
            }],
        }
    }

    /// An engine whose root group logs requests and recovers from panics.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.use_middleware(Logger).use_middleware(Recovery);
        engine
    }

    fn root(&mut self) -> RouterGroup<'_> {
        RouterGroup {
            engine: self,
            index: 0,
        }
    }

    /// Add middleware that runs for every request.
    pub fn use_middleware<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.root().use_middleware(handler);
        self
    }

    /// Create a group whose routes and middleware live under `prefix`.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        self.groups.push(GroupMiddleware {
            matcher: PathPrefixMatcher::new(prefix),
            handlers: Vec::new(),
        });
        let index = self.groups.len() - 1;
        tracing::debug!(prefix = %prefix, "Route group created");
        RouterGroup {
            engine: self,
            index,
        }
    }

    pub fn add_route<H: Handler>(&mut self, method: Method, pattern: &str, handler: H) -> &mut Self {
        self.root().add_route(method, pattern, handler);
        self
    }

    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.add_route(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.add_route(Method::POST, pattern, handler)
    }

    /// Serve files under `root` at `GET <relative_path>/*filepath`.
    pub fn static_files(&mut self, relative_path: &str, root: impl Into<PathBuf>) -> &mut Self {
        self.root().static_files(relative_path, root);
        self
    }

    /// Number of registered routes.
    pub fn route_count(&self) -> usize {
        self.table.len()
    }

    /// Freeze routes and groups for serving.
    pub fn into_dispatcher(self) -> Dispatcher {
        Dispatcher::new(self.table, self.groups)
    }
}

/// Handle on one route group of an [`Engine`].
pub struct RouterGroup<'a> {
    engine: &'a mut Engine,
    index: usize,
}

impl RouterGroup<'_> {
    /// Full prefix of this group.
    pub fn prefix(&self) -> &str {
        self.engine.groups[self.index].matcher.prefix()
    }

    /// Create a group nested under this one.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let matcher = self.engine.groups[self.index].matcher.join(prefix);
        self.engine.groups.push(GroupMiddleware {
            matcher,
            handlers: Vec::new(),
        });
        let index = self.engine.groups.len() - 1;
        tracing::debug!(prefix = %self.engine.groups[index].matcher.prefix(), "Route group created");
        RouterGroup {
            engine: &mut *self.engine,
            index,
        }
    }

    /// Add middleware for requests whose path starts with this group's prefix.
    pub fn use_middleware<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.engine.groups[self.index].handlers.push(boxed(handler));
        self
    }

    /// Register a route; the group prefix is prepended to `pattern`.
    pub fn add_route<H: Handler>(&mut self, method: Method, pattern: &str, handler: H) -> &mut Self {
        let full_pattern = format!("{}{}", self.prefix(), pattern);
        self.engine
            .table
            .register(method.as_str(), &full_pattern, boxed(handler));
        self
    }

    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.add_route(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> &mut Self {
        self.add_route(Method::POST, pattern, handler)
    }

    /// Serve files under `root` at `GET <prefix><relative_path>/*filepath`.
    pub fn static_files(&mut self, relative_path: &str, root: impl Into<PathBuf>) -> &mut Self {
        let files = StaticFiles::new(root);
        tracing::debug!(
            prefix = %self.prefix(),
            path = %relative_path,
            root = %files.root().display(),
            "Static files mounted"
        );
        let pattern = format!(
            "{}/*{}",
            relative_path.trim_end_matches('/'),
            FILEPATH_PARAM
        );
        self.get(&pattern, files)
    }
}
