//! Handler chain building blocks.
//!
//! # Responsibilities
//! - Define the handler contract shared by middleware and route handlers
//! - Define the flow value a handler hands back to the chain driver
//! - Track where a request's chain is in its lifecycle
//!
//! # Design Decisions
//! - Continuation is a return value, not recursion: returning
//!   [`Flow::Continue`] lets the driver run the next handler
//! - Wrap-around middleware may still call [`Context::next`] inline and
//!   return the flow it got back
//! - Handlers are synchronous; they run on the request's own worker thread

use std::sync::Arc;

use crate::http::context::Context;

/// What a handler tells the chain driver once it returns.
///
/// A handler that returns [`Flow::Handled`] without writing anything leaves
/// the response at its defaults (an empty `200 OK`). The chain stops there
/// all the same; nothing downstream runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next handler in the chain.
    Continue,
    /// The response is final; stop the chain here.
    Handled,
    /// The chain was aborted with an error response.
    Aborted,
}

/// Lifecycle of a request's handler chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// No handler has run yet.
    NotStarted,
    /// A handler is executing.
    Running,
    /// Every handler in the chain was reached.
    Completed,
    /// A handler stopped the chain before its end.
    Halted,
    /// [`Context::abort`] was called.
    Aborted,
}

impl ChainState {
    /// Returns true once no further handler will run.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            ChainState::Completed | ChainState::Halted | ChainState::Aborted
        )
    }
}

/// A middleware or route handler.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: &mut Context) -> Flow;
}

impl<F> Handler for F
where
    F: Fn(&mut Context) -> Flow + Send + Sync + 'static,
{
    fn call(&self, ctx: &mut Context) -> Flow {
        self(ctx)
    }
}

/// Shared, type-erased handler as stored in route tables and chains.
pub type BoxedHandler = Arc<dyn Handler>;

/// Erase a handler's concrete type.
pub fn boxed<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_states() {
        assert!(!ChainState::NotStarted.is_finished());
        assert!(!ChainState::Running.is_finished());
        assert!(ChainState::Completed.is_finished());
        assert!(ChainState::Halted.is_finished());
        assert!(ChainState::Aborted.is_finished());
    }
}
