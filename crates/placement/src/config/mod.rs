use std::env;
use std::fmt;

use crate::engine::{
    CategoryThresholds, PlacementEngine, ScorePolicy, SubjectCatalog, ThresholdPreset,
};

const ENV_APP_ENV: &str = "APP_ENV";
const ENV_LOG_LEVEL: &str = "APP_LOG_LEVEL";
const ENV_THRESHOLDS: &str = "PLACEMENT_THRESHOLDS";
const ENV_SCORE_POLICY: &str = "PLACEMENT_SCORE_POLICY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Settings read from the process environment and an optional `.env` file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub placement: PlacementConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = read_var(ENV_APP_ENV)
            .map(|value| AppEnvironment::parse(&value))
            .unwrap_or_default();
        let log_level = read_var(ENV_LOG_LEVEL).unwrap_or_else(|| "info".to_string());

        let thresholds = match read_var(ENV_THRESHOLDS) {
            Some(value) => ThresholdPreset::parse(&value)
                .ok_or(ConfigError::InvalidThresholdPreset { value })?,
            None => ThresholdPreset::default(),
        };
        let score_policy = match read_var(ENV_SCORE_POLICY) {
            Some(value) => {
                ScorePolicy::parse(&value).ok_or(ConfigError::InvalidScorePolicy { value })?
            }
            None => ScorePolicy::default(),
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            placement: PlacementConfig {
                thresholds,
                score_policy,
            },
        })
    }
}

/// Blank values count as unset.
fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive, e.g. `info` or `placement=debug`.
    pub log_level: String,
}

/// Grading rules applied to every test the tool records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementConfig {
    pub thresholds: ThresholdPreset,
    pub score_policy: ScorePolicy,
}

impl PlacementConfig {
    pub fn engine(&self) -> PlacementEngine {
        PlacementEngine::new(
            SubjectCatalog::bece(),
            CategoryThresholds::from_preset(self.thresholds),
        )
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidThresholdPreset { value: String },
    InvalidScorePolicy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThresholdPreset { value } => write!(
                f,
                "{ENV_THRESHOLDS} must be 'bece' or 'legacy' (got '{}')",
                value
            ),
            ConfigError::InvalidScorePolicy { value } => write!(
                f,
                "{ENV_SCORE_POLICY} must be 'clamp' or 'reject' (got '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
