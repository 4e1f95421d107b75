//! Top-level Flakescan configuration with 4-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, VolatilityConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`FLAKESCAN_*`)
/// 3. Project config (`flakescan.toml` in project root)
/// 4. User config (`~/.flakescan/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FlakescanConfig {
    pub analysis: AnalysisConfig,
    pub volatility: VolatilityConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub noise_threshold: Option<f64>,
    pub epsilon: Option<f64>,
    pub noise_blocking: Option<bool>,
}

impl FlakescanConfig {
    /// Load configuration with 4-layer resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        // Non-parse errors from user config are not fatal.
                        tracing::warn!("skipping user config: {e}");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("flakescan.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &FlakescanConfig) -> Result<(), ConfigError> {
        if let Some(threshold) = config.analysis.noise_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.noise_threshold".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        if let Some(epsilon) = config.analysis.epsilon {
            if !epsilon.is_finite() || epsilon < 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.epsilon".to_string(),
                    message: "must be a finite value >= 0.0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut FlakescanConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: FlakescanConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut FlakescanConfig, other: &FlakescanConfig) {
        if other.analysis.noise_threshold.is_some() {
            base.analysis.noise_threshold = other.analysis.noise_threshold;
        }
        if other.analysis.epsilon.is_some() {
            base.analysis.epsilon = other.analysis.epsilon;
        }
        if other.analysis.noise_blocking.is_some() {
            base.analysis.noise_blocking = other.analysis.noise_blocking;
        }

        if !other.volatility.create.is_empty() {
            base.volatility.create = other.volatility.create.clone();
        }
        if !other.volatility.read.is_empty() {
            base.volatility.read = other.volatility.read.clone();
        }
        if !other.volatility.update.is_empty() {
            base.volatility.update = other.volatility.update.clone();
        }
        if !other.volatility.delete.is_empty() {
            base.volatility.delete = other.volatility.delete.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `FLAKESCAN_NOISE_THRESHOLD`, `FLAKESCAN_EPSILON`, etc.
    fn apply_env_overrides(config: &mut FlakescanConfig) {
        if let Ok(val) = std::env::var("FLAKESCAN_NOISE_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.analysis.noise_threshold = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FLAKESCAN_EPSILON") {
            if let Ok(v) = val.parse::<f64>() {
                config.analysis.epsilon = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FLAKESCAN_NOISE_BLOCKING") {
            if let Ok(v) = val.parse::<bool>() {
                config.analysis.noise_blocking = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut FlakescanConfig, cli: &CliOverrides) {
        if let Some(v) = cli.noise_threshold {
            config.analysis.noise_threshold = Some(v);
        }
        if let Some(v) = cli.epsilon {
            config.analysis.epsilon = Some(v);
        }
        if let Some(v) = cli.noise_blocking {
            config.analysis.noise_blocking = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user config path: `~/.flakescan/config.toml`.
fn user_config_path() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".flakescan").join("config.toml"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
