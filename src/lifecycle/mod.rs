//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! signals.rs: SIGTERM/SIGINT
//!     → shutdown.rs: Shutdown::trigger
//!     → every HttpServer::run stops accepting and drains
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
