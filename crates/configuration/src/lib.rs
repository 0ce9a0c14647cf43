use crate::error::ConfigError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalyticsSettings, Config, DataSettings, ForecastSettings, LoggingSettings, ModelSource,
    MAX_HORIZON, default_models,
};

/// Base name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Prefix of environment variables that override file settings,
/// e.g. `RECURRA__FORECAST__HORIZON=10`.
pub const ENV_PREFIX: &str = "RECURRA";

/// Loads the application configuration.
///
/// With no explicit path, an optional `config.toml` in the working directory
/// is read; an explicit path must exist. Environment variables are layered
/// on top, and the result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

    let config = finish(builder)?;
    tracing::debug!(models = config.models.len(), "Configuration loaded.");
    Ok(config)
}

/// Deserializes and validates whatever sources the builder was given.
fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Config, ConfigError> {
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{ChurnMeanPolicy, DuplicateYearPolicy, UnitScale};
    use rust_decimal_macros::dec;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        finish(builder)
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = from_toml("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.forecast.horizon, 5);
        assert_eq!(config.forecast.default_growth_rate_pct, dec!(5));
        assert_eq!(config.analytics.unit_scale, UnitScale::Trillions);
        assert_eq!(config.models.len(), 3);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = from_toml(
            r#"
            [analytics]
            unit_scale = "millions"
            churn_mean_policy = "skip_undefined"
            duplicate_years = "keep_first"

            [forecast]
            default_growth_rate_pct = -2.5
            horizon = 8

            [[models]]
            id = "saas"
            label = "SaaS"
            file = "saas.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.analytics.unit_scale, UnitScale::Millions);
        assert_eq!(config.analytics.churn_mean_policy, ChurnMeanPolicy::SkipUndefined);
        assert_eq!(config.analytics.duplicate_years, DuplicateYearPolicy::KeepFirst);
        assert_eq!(config.forecast.default_growth_rate_pct, dec!(-2.5));
        assert_eq!(config.forecast.horizon, 8);
        assert_eq!(config.models, vec![ModelSource::new("saas", "SaaS", "saas.csv")]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_policy_fails_to_load() {
        let result = from_toml("[analytics]\nunit_scale = \"furlongs\"\n");
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_validation_runs_after_loading() {
        let result = from_toml("[forecast]\nhorizon = 1000\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("does/not/exist.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
