//! Tracing Setup
//!
//! Initializes tracing-subscriber from [`LoggingConfig`]. `RUST_LOG`, when
//! set, takes precedence over the configured level.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for query output.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Console => builder.try_init()?,
        LogFormat::Json => builder.json().try_init()?,
    }

    tracing::debug!(
        level = config.level.as_str(),
        format = ?config.format,
        "tracing initialized"
    );

    Ok(())
}
