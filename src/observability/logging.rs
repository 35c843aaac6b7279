//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("logging already initialized: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Build the filter: `RUST_LOG` if set, otherwise the configured level.
pub fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(format!(
            "waypoint={level},tower_http={level}",
            level = config.log_level.to_ascii_lowercase()
        ))?),
    }
}

/// Install the global subscriber. Call once, early in `main`.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }
    Ok(())
}
