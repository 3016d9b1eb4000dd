//! Configuration structures.

use pivot_core::error::PivotError;
use pivot_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub runner: RunnerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl AppConfig {
    /// Check for values that cannot possibly work.
    pub fn validate(&self) -> Result<(), PivotError> {
        if self.runner.workers == 0 {
            return Err(PivotError::Validation(
                "runner.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "pivot-signals".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Signal engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Bars by which raw pivot flags are delayed before being usable
    pub confirmation_lag: usize,
    /// Gate buy breakouts on the trend average
    pub use_trend_filter: bool,
    /// Series shorter than this get all-"None" output without a scan
    pub minimum_bars_required: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            confirmation_lag: 1,
            use_trend_filter: true,
            minimum_bars_required: 0,
        }
    }
}

impl EngineSettings {
    /// Build the per-series scan configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            confirmation_lag: self.confirmation_lag,
            use_trend_filter: self.use_trend_filter,
            ..EngineConfig::default()
        }
    }
}

/// Batch runner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerSettings {
    /// Maximum number of pairs processed in parallel
    pub workers: usize,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

/// Data directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    pub dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    pub path: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: "signals.csv".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_recognized_options() {
        let config = AppConfig::default();
        assert_eq!(config.engine.confirmation_lag, 1);
        assert!(config.engine.use_trend_filter);
        assert_eq!(config.engine.minimum_bars_required, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = AppConfig {
            runner: RunnerSettings { workers: 0 },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [engine]
            confirmation_lag = 2
            use_trend_filter = false
            minimum_bars_required = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.confirmation_lag, 2);
        assert!(!config.engine.use_trend_filter);
        assert_eq!(config.runner.workers, 4);

        let engine = config.engine.engine_config();
        assert_eq!(engine.confirmation_lag, 2);
        assert!(!engine.use_trend_filter);
    }
}
