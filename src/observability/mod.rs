//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, dispatcher, server:
//!     → logging.rs (structured log events, request ID on every line)
//!     → metrics.rs (per-request counter and latency histogram)
//!
//! Consumers:
//!     → stdout (text or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
