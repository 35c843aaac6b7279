//! Request dispatch.
//!
//! # Data Flow
//! ```text
//! Context (method, path)
//!     → group middleware whose prefix the path starts with, in group order
//!     → RouteTable::resolve
//!         match: bind params, append route handler
//!         miss:  append not-found handler
//!     → Context::next (run the chain)
//! ```
//!
//! # Design Decisions
//! - Frozen after construction; shared across requests behind an `Arc`
//! - A routing miss is answered locally with 404, never surfaced as an error

use axum::http::StatusCode;

use crate::http::chain::{boxed, BoxedHandler, Flow};
use crate::http::context::Context;
use crate::routing::{PathPrefixMatcher, RouteTable};

/// Middleware registered on a route group.
#[derive(Clone)]
pub struct GroupMiddleware {
    pub matcher: PathPrefixMatcher,
    pub handlers: Vec<BoxedHandler>,
}

/// Immutable routing state serving requests.
pub struct Dispatcher {
    table: RouteTable<BoxedHandler>,
    groups: Vec<GroupMiddleware>,
    not_found: BoxedHandler,
}

impl Dispatcher {
    pub fn new(table: RouteTable<BoxedHandler>, groups: Vec<GroupMiddleware>) -> Self {
        Self {
            table,
            groups,
            not_found: boxed(not_found),
        }
    }

    /// Middleware of every group whose prefix covers `path`.
    pub fn middleware_for(&self, path: &str) -> Vec<BoxedHandler> {
        self.groups
            .iter()
            .filter(|group| group.matcher.matches(path))
            .flat_map(|group| group.handlers.iter().cloned())
            .collect()
    }

    /// Build the request's chain and run it.
    pub fn dispatch(&self, mut ctx: Context) -> Context {
        let mut chain = self.middleware_for(ctx.path());

        match self.table.resolve(ctx.method().as_str(), ctx.path()) {
            Some(route) => {
                let handler = route.handler.clone();
                ctx.bind_route(route.pattern, route.params);
                chain.push(handler);
            }
            None => {
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    method = %ctx.method(),
                    path = %ctx.path(),
                    "No route matched"
                );
                chain.push(self.not_found.clone());
            }
        }

        ctx.set_handlers(chain);
        ctx.next();
        ctx
    }

    pub fn routes(&self) -> &RouteTable<BoxedHandler> {
        &self.table
    }
}

fn not_found(ctx: &mut Context) -> Flow {
    let body = format!("404 NOT FOUND: {}\n", ctx.path());
    ctx.string(StatusCode::NOT_FOUND, body);
    Flow::Handled
}
