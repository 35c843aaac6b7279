//! Built-in middleware.
//!
//! Both run the rest of the chain inline through `Context::next`, so they
//! observe the final response of every request they wrap.

pub mod logger;
pub mod recovery;

pub use logger::Logger;
pub use recovery::Recovery;
