//! TOML run configuration: one data source, many named strategies.
//!
//! ```toml
//! [data]
//! path = "data/btc_usdt_1h.csv"
//! symbol = "BTC/USDT"
//! timeframe = "1h"
//!
//! [strategies.close_open_1pct]
//! stop_loss_pct = 1.0
//! take_profit_pct = 2.5
//! [strategies.close_open_1pct.signal]
//! type = "close_open_threshold"
//! threshold_pct = 0.5
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sigbench_core::engine::EngineConfig;
use sigbench_core::error::ParameterError;
use sigbench_core::signals::{SignalError, SignalKind};

/// Unique identifier for a configuration (content-addressable hash).
pub type RunId = String;

/// Errors from reading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config defines no strategies")]
    NoStrategies,

    #[error("strategy '{name}': {source}")]
    InvalidParameter {
        name: String,
        source: ParameterError,
    },

    #[error("strategy '{name}': {source}")]
    InvalidSignal { name: String, source: SignalError },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where bars come from and how they are labelled in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file of bars. Relative paths resolve against the config file.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
}

fn default_symbol() -> String {
    "BTC/USDT".to_string()
}

fn default_timeframe() -> String {
    "1h".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            symbol: default_symbol(),
            timeframe: default_timeframe(),
        }
    }
}

/// One named strategy: a signal provider plus its engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(default = "default_stop_loss_pct")]
    pub stop_loss_pct: f64,
    #[serde(default = "default_take_profit_pct")]
    pub take_profit_pct: f64,
    #[serde(default = "default_trade_size")]
    pub trade_size: f64,
    #[serde(default)]
    pub commission_pct: f64,
    pub signal: SignalKind,
}

fn default_stop_loss_pct() -> f64 {
    1.0
}

fn default_take_profit_pct() -> f64 {
    2.5
}

fn default_trade_size() -> f64 {
    1.0
}

impl StrategyConfig {
    /// Strategy with the default 1% / 2.5% levels.
    pub fn new(signal: SignalKind) -> Self {
        Self {
            stop_loss_pct: default_stop_loss_pct(),
            take_profit_pct: default_take_profit_pct(),
            trade_size: default_trade_size(),
            commission_pct: 0.0,
            signal,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(
            self.stop_loss_pct,
            self.take_profit_pct,
            self.trade_size,
            self.commission_pct,
        )
    }
}

/// Top-level configuration. Strategies are keyed and iterated by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub strategies: BTreeMap<String, StrategyConfig>,
}

impl RunnerConfig {
    /// Parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;

        if let (Some(data_path), Some(base)) = (config.data.path.as_ref(), path.parent()) {
            if data_path.is_relative() {
                config.data.path = Some(base.join(data_path));
            }
        }
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// At least one strategy; every engine config and signal must be valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }
        for (name, strategy) in &self.strategies {
            strategy
                .engine_config()
                .validate()
                .map_err(|source| ConfigError::InvalidParameter {
                    name: name.clone(),
                    source,
                })?;
            strategy
                .signal
                .build()
                .map_err(|source| ConfigError::InvalidSignal {
                    name: name.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Deterministic BLAKE3 fingerprint of the configuration.
    ///
    /// Two identical configs share a RunId.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    /// The built-in strategy set, one per rule-based provider type, with default levels.
    pub fn builtin() -> Self {
        let strategies = SignalKind::catalog()
            .into_iter()
            .filter(|(kind, _)| !matches!(kind, SignalKind::Null | SignalKind::Precomputed))
            .map(|(kind, _)| (kind.type_name().to_string(), StrategyConfig::new(kind)))
            .collect();
        Self {
            data: DataConfig::default(),
            strategies,
        }
    }
}
