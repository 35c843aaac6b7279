//! HTTP request handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum fallback, body buffering, timeout, tracing)
//!     → context.rs (request view + response buffer, one per request)
//!     → dispatcher.rs (group middleware + route lookup)
//!     → chain.rs (handlers run in order until one stops)
//!     → response.rs (buffered response → axum response)
//!     → Send to client
//! ```
//!
//! Routes and groups are declared on an [`Engine`] and frozen into a
//! [`Dispatcher`] before the server starts.

pub mod chain;
pub mod context;
pub mod dispatcher;
pub mod engine;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use chain::{boxed, BoxedHandler, ChainState, Flow, Handler};
pub use context::Context;
pub use dispatcher::Dispatcher;
pub use engine::{Engine, RouterGroup};
pub use middleware::{Logger, Recovery};
pub use request::X_REQUEST_ID;
pub use response::{Payload, ResponseWriter};
pub use server::HttpServer;
pub use static_files::StaticFiles;
