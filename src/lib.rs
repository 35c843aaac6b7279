//! waypoint: HTTP routing and middleware composition.
//!
//! Routes are registered per method in segment tries supporting static
//! segments, `:name` parameters and trailing `*name` catch-alls. Every
//! request runs an ordered chain of group middleware ending in the matched
//! route handler; any handler can stop the chain or abort it with an error
//! response.
//!
//! ```
//! use waypoint::http::{Context, Engine, Flow};
//! use axum::http::StatusCode;
//!
//! let mut engine = Engine::with_defaults();
//! engine.get("/p/:lang/doc", |ctx: &mut Context| {
//!     let lang = ctx.param("lang").unwrap_or_default().to_string();
//!     ctx.string(StatusCode::OK, format!("docs for {}", lang));
//!     Flow::Handled
//! });
//! let dispatcher = engine.into_dispatcher();
//! assert!(dispatcher.routes().resolve("GET", "/p/go/doc").is_some());
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::{Context, Engine, Flow, HttpServer};
pub use lifecycle::Shutdown;
