use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

#[derive(Debug)]
pub enum TelemetryError {
    InvalidDirective {
        directive: String,
        source: ParseError,
    },
    AlreadyInstalled(TryInitError),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidDirective { directive, .. } => {
                write!(f, "APP_LOG_LEVEL '{}' is not a valid log filter", directive)
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "log subscriber already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidDirective { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(err),
        }
    }
}

/// Installs the global subscriber, writing compact lines to stderr so stdout
/// stays free for command output.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = filter_for(config)?;
    let output = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

/// `RUST_LOG` when it parses, otherwise the configured level.
fn filter_for(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(config.log_level.trim()).map_err(|source| {
        TelemetryError::InvalidDirective {
            directive: config.log_level.clone(),
            source,
        }
    })
}
