//! Backtest runner: wires together signal providers, engine, and metrics.
//!
//! Entry points:
//! - `run_strategy()`: one named strategy over loaded bars.
//! - `run_all()`: every configured strategy, in parallel, results in name order.
//! - `check_latest_signals()`: the newest-bar signal for every strategy.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use sigbench_core::domain::TradeRecord;
use sigbench_core::engine::{run_backtest, EngineConfig};
use sigbench_core::error::{EngineError, InputError};
use sigbench_core::metrics::PerformanceMetrics;
use sigbench_core::signals::{latest_signal, LatestSignal, SignalError, SignalKind};

use crate::config::{RunnerConfig, StrategyConfig};
use crate::data_loader::LoadedData;

/// Errors from a single strategy run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("strategy '{strategy}': {source}")]
    Signal {
        strategy: String,
        source: SignalError,
    },

    #[error("strategy '{strategy}': {source}")]
    Engine {
        strategy: String,
        source: EngineError,
    },
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single strategy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub strategy: String,
    pub signal: SignalKind,
    pub symbol: String,
    pub timeframe: String,
    pub config: EngineConfig,
    pub trades: Vec<TradeRecord>,
    pub metrics: PerformanceMetrics,
    pub bar_count: usize,
    pub signal_count: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub dataset_hash: String,
    pub synthetic: bool,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Outcome of one strategy inside `run_all`. A failure stays local to its strategy.
#[derive(Debug)]
pub struct StrategyOutcome {
    pub name: String,
    pub result: Result<BacktestResult, RunError>,
}

/// Newest-bar signal for one strategy.
#[derive(Debug)]
pub struct SignalCheck {
    pub name: String,
    /// `Ok(None)` when there are no bars.
    pub result: Result<Option<LatestSignal>, RunError>,
}

/// Run one strategy: build its provider, annotate bars, run the engine.
pub fn run_strategy(
    name: &str,
    strategy: &StrategyConfig,
    data: &LoadedData,
) -> Result<BacktestResult, RunError> {
    let provider = strategy
        .signal
        .build()
        .map_err(|source| RunError::Signal {
            strategy: name.to_string(),
            source,
        })?;
    let engine_err = |source: EngineError| RunError::Engine {
        strategy: name.to_string(),
        source,
    };

    let (Some(first), Some(last)) = (data.bars.first(), data.bars.last()) else {
        return Err(engine_err(InputError::Empty.into()));
    };
    let (start, end) = (first.timestamp, last.timestamp);

    let bars = provider.annotate(&data.bars);
    let config = strategy.engine_config();
    let run = run_backtest(&bars, &config).map_err(engine_err)?;

    info!(
        strategy = name,
        signal = provider.name(),
        trades = run.metrics.trade_count,
        total_return = run.metrics.total_return,
        "strategy complete"
    );

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        strategy: name.to_string(),
        signal: strategy.signal.clone(),
        symbol: data.symbol.clone(),
        timeframe: data.timeframe.clone(),
        config,
        trades: run.trades,
        metrics: run.metrics,
        bar_count: run.bar_count,
        signal_count: run.signal_count,
        start,
        end,
        dataset_hash: data.dataset_hash.clone(),
        synthetic: data.synthetic,
    })
}

/// Run every configured strategy in parallel.
///
/// Outcomes come back in strategy-name order: the config map iterates by name
/// and the indexed parallel collect preserves input order.
pub fn run_all(config: &RunnerConfig, data: &LoadedData) -> Vec<StrategyOutcome> {
    let strategies: Vec<(&String, &StrategyConfig)> = config.strategies.iter().collect();

    let outcomes: Vec<StrategyOutcome> = strategies
        .par_iter()
        .map(|(name, strategy)| StrategyOutcome {
            name: (*name).clone(),
            result: run_strategy(name, strategy, data),
        })
        .collect();

    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            warn!(strategy = %outcome.name, error = %e, "strategy failed");
        }
    }
    outcomes
}

/// Annotate bars per strategy and report the newest bar's signal.
pub fn check_latest_signals(config: &RunnerConfig, data: &LoadedData) -> Vec<SignalCheck> {
    config
        .strategies
        .iter()
        .map(|(name, strategy)| {
            let result = strategy
                .signal
                .build()
                .map(|provider| latest_signal(&provider.annotate(&data.bars)))
                .map_err(|source| RunError::Signal {
                    strategy: name.clone(),
                    source,
                });
            SignalCheck {
                name: name.clone(),
                result,
            }
        })
        .collect()
}
