//! Request logging middleware.

use crate::http::chain::{Flow, Handler};
use crate::http::context::Context;
use crate::observability::metrics::{self, UNMATCHED_ROUTE};

/// Logs every request once the rest of its chain has run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger;

impl Handler for Logger {
    fn call(&self, ctx: &mut Context) -> Flow {
        let flow = ctx.next();
        let start = ctx.started_at();

        let status = ctx.status_code().as_u16();
        let route = ctx.full_path().unwrap_or(UNMATCHED_ROUTE);
        tracing::info!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            route = %route,
            status,
            state = ?ctx.chain_state(),
            elapsed = ?start.elapsed(),
            "Request handled"
        );
        metrics::record_request(ctx.method().as_str(), status, route, start);

        flow
    }
}
