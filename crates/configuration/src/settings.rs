use crate::error::ConfigError;
use core_types::{ChurnMeanPolicy, DuplicateYearPolicy, UnitScale};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Longest forecast the application will agree to project.
pub const MAX_HORIZON: u32 = 100;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an absent `config.toml` is a valid setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub analytics: AnalyticsSettings,
    pub forecast: ForecastSettings,
    pub logging: LoggingSettings,
    pub models: Vec<ModelSource>,
}

/// Where dataset files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory that relative model file names are resolved against.
    pub directory: PathBuf,
}

/// Policies applied by the metrics engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    pub unit_scale: UnitScale,
    pub churn_mean_policy: ChurnMeanPolicy,
    pub duplicate_years: DuplicateYearPolicy,
}

/// Defaults for the ARR scenario projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Annual ARR growth used when none is given, in percent.
    pub default_growth_rate_pct: Decimal,
    /// Number of years to project.
    pub horizon: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set (e.g. "info", "analytics=debug").
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

/// A business model the catalog can load, and the file that holds its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSource {
    pub id: String,
    pub label: String,
    pub file: PathBuf,
}

impl ModelSource {
    pub fn new(id: &str, label: &str, file: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            file: PathBuf::from(file),
        }
    }
}

// --- Default Implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataSettings::default(),
            analytics: AnalyticsSettings::default(),
            forecast: ForecastSettings::default(),
            logging: LoggingSettings::default(),
            models: default_models(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            default_growth_rate_pct: Decimal::from(5),
            horizon: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "recurra.log".to_string(),
        }
    }
}

/// The three digital business models of the automotive study the datasets come from.
pub fn default_models() -> Vec<ModelSource> {
    vec![
        ModelSource::new(
            "auto-subscription",
            "Auto Subscription (MaaS/Kinto)",
            "Auto_Subscription_Kinto.csv",
        ),
        ModelSource::new(
            "parts-marketplace",
            "Parts Marketplace",
            "Auto_Marketplace_Parts.csv",
        ),
        ModelSource::new(
            "connected-services",
            "Connected Services (Data)",
            "Connected_Services_Data.csv",
        ),
    ]
}

impl Config {
    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forecast.horizon > MAX_HORIZON {
            return Err(ConfigError::ValidationError(format!(
                "forecast.horizon must be at most {}, got {}",
                MAX_HORIZON, self.forecast.horizon
            )));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for model in &self.models {
            if model.id.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "model id cannot be empty".to_string(),
                ));
            }
            if model.file.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "model '{}' has no file",
                    model.id
                )));
            }
            if !seen.insert(model.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate model id '{}'",
                    model.id
                )));
            }
        }

        Ok(())
    }
}
