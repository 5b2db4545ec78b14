#![forbid(unsafe_code)]

//! Subscriber setup for native hosts.
//!
//! The runtime only emits `tracing` events; installing a subscriber is the
//! host's call. Native harnesses and tools can use [`init`], which honors
//! `RUST_LOG` and falls back to the given directive.
//!
//! ```ignore
//! folio_runtime::logging::init("folio_runtime=debug", LogFormat::Compact)?;
//! ```

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set and valid.
pub fn init(default_filter: &str, format: LogFormat) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| LoggingError::Install(e.to_string()))
}
