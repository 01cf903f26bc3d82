//! Tracing setup for the console. Filter directives come from `RUST_LOG`
//! when set, otherwise from the `APP_LOG_LEVEL` value carried in
//! [`TelemetryConfig`]; output formatting follows the deployment
//! environment.

use crate::config::{AppEnvironment, TelemetryConfig};
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    Filter { directives: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directives, .. } => {
                write!(f, "'{directives}' is not a valid tracing filter")
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Resolve the active filter: `RUST_LOG` wins, `APP_LOG_LEVEL` is the
/// fallback. Both are validated the same way so a typo in either fails
/// startup instead of silently logging nothing.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let directives = match std::env::var("RUST_LOG") {
        Ok(raw) => raw,
        Err(_) => config.log_level.clone(),
    };
    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::Filter { directives, source })
}

pub fn init(
    environment: AppEnvironment,
    config: &TelemetryConfig,
) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    // Plain output for production log shippers, colors for a local terminal.
    match environment {
        AppEnvironment::Development => builder.with_ansi(true).try_init(),
        AppEnvironment::Test | AppEnvironment::Production => {
            builder.with_ansi(false).try_init()
        }
    }
    .map_err(TelemetryError::Subscriber)
}
