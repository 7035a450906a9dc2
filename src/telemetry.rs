//! Logging setup for the command-line binary.

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log level could not be parsed as a filter directive.
    #[error("invalid log level/filter '{value}': {source}")]
    EnvFilter {
        /// The rejected filter string.
        value: String,
        /// The parse failure.
        #[source]
        source: ParseError,
    },

    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// Installs a compact `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `log_level` when it is set and valid.
pub fn init(log_level: &str) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level).map_err(|source| TelemetryError::EnvFilter {
            value: log_level.to_string(),
            source,
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| TelemetryError::Subscriber(err.to_string()))
}
