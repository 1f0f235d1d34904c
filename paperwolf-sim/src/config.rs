//! Serializable engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading an engine config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunable parameters of the simulation engine.
///
/// Defaults reproduce the canonical game rules; a TOML file can override
/// them for experimentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Starting (and margin-call refill) capital.
    pub initial_balance: f64,
    /// Take-profit trigger, in percent gain.
    pub take_profit_pct: f64,
    /// Stop-loss trigger, in percent loss (negative).
    pub stop_loss_pct: f64,
    /// Fraction of balance allocated per entry.
    pub allocation_fraction: f64,
    /// Confidence boost for volume-confirmed setups.
    pub volume_boost: f64,
    /// Optional cap on the persisted history log. `None` keeps the
    /// original unbounded behavior.
    pub history_limit: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_balance: 10_000.0,
            take_profit_pct: 1.0,
            stop_loss_pct: -0.5,
            allocation_fraction: 0.20,
            volume_boost: 0.10,
            history_limit: None,
        }
    }
}

impl SimConfig {
    /// Load from a TOML file; unset fields keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_balance <= 0.0 {
            return Err(ConfigError::Invalid(
                "initial_balance must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.allocation_fraction) {
            return Err(ConfigError::Invalid(
                "allocation_fraction must be in [0, 1]".into(),
            ));
        }
        if self.stop_loss_pct >= 0.0 {
            return Err(ConfigError::Invalid("stop_loss_pct must be negative".into()));
        }
        if self.take_profit_pct <= 0.0 {
            return Err(ConfigError::Invalid(
                "take_profit_pct must be positive".into(),
            ));
        }
        Ok(())
    }
}
