//! Panic containment middleware.
//!
//! Runs the rest of the chain inline and turns a panic anywhere downstream
//! into a `500 {"message": "Internal Server Error"}` answer. Install it
//! early in the root group so it wraps every route.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use axum::http::StatusCode;

use crate::http::chain::{Flow, Handler};
use crate::http::context::Context;

/// Catches panics raised by later handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recovery;

impl Handler for Recovery {
    fn call(&self, ctx: &mut Context) -> Flow {
        match panic::catch_unwind(AssertUnwindSafe(|| ctx.next())) {
            Ok(flow) => flow,
            Err(payload) => {
                tracing::error!(
                    request_id = %ctx.request_id(),
                    method = %ctx.method(),
                    path = %ctx.path(),
                    panic = %panic_message(payload.as_ref()),
                    "Handler panicked"
                );
                ctx.abort(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
