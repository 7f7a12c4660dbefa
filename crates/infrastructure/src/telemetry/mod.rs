//! Logging initialization
//!
//! Installs a `tracing` subscriber with an `EnvFilter` and a text or JSON
//! formatter. `RUST_LOG` takes precedence over the configured filter.

use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, ServerConfig};

/// Errors that can occur while initializing logging
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Invalid filter directives
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Build the filter from `RUST_LOG`, falling back to the configured directives
pub fn build_filter(configured: &str) -> Result<EnvFilter, TelemetryError> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    select_filter(from_env.as_deref(), configured)
}

/// Empty or unparseable environment directives fall back to `configured`
fn select_filter(from_env: Option<&str>, configured: &str) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = from_env
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return Ok(filter);
    }
    EnvFilter::try_new(configured).map_err(|e| TelemetryError::Filter(e.to_string()))
}

/// Install the global subscriber
pub fn init_logging(config: &ServerConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(&config.log_filter)?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init(),
    }
    .map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(format = ?config.log_format, "Logging initialized");
    Ok(())
}
