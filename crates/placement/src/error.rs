use crate::config::ConfigError;
use crate::engine::ScoreValidationError;
use crate::intake::ScoreSheetError;
use crate::records::PlacementServiceError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Scores(ScoreValidationError),
    ScoreSheet(ScoreSheetError),
    Records(PlacementServiceError),
    Output(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Scores(err) => write!(f, "invalid scores: {}", err),
            AppError::ScoreSheet(err) => write!(f, "score sheet error: {}", err),
            AppError::Records(err) => write!(f, "student records error: {}", err),
            AppError::Output(err) => write!(f, "output error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Scores(err) => Some(err),
            AppError::ScoreSheet(err) => Some(err),
            AppError::Records(err) => Some(err),
            AppError::Output(err) => Some(err),
        }
    }
}

impl AppError {
    /// Whether the failure came from user-supplied input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AppError::Scores(_) | AppError::ScoreSheet(_) | AppError::Records(_)
        )
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ScoreValidationError> for AppError {
    fn from(value: ScoreValidationError) -> Self {
        Self::Scores(value)
    }
}

impl From<ScoreSheetError> for AppError {
    fn from(value: ScoreSheetError) -> Self {
        Self::ScoreSheet(value)
    }
}

impl From<PlacementServiceError> for AppError {
    fn from(value: PlacementServiceError) -> Self {
        Self::Records(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}
