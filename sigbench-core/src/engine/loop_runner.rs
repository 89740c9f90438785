//! Bar-by-bar scan, the heart of the backtesting engine.
//!
//! Per bar, in order:
//! 1. Protective exits for an open position (stop before target)
//! 2. Reversal on an opposite signal: close at the bar's close, re-enter at its open
//! 3. Entry from flat on a non-zero signal
//!
//! After the last bar an open position is closed at that bar's close.

use tracing::info;

use crate::domain::{Bar, TradeRecord};
use crate::error::EngineError;
use crate::metrics::PerformanceMetrics;

use super::config::EngineConfig;
use super::state::{EngineState, RunResult};
use super::validate::validate_bars;

/// Run a backtest over signaled bars.
///
/// Parameters and bars are validated before the first bar is simulated;
/// on error no partial ledger is produced.
pub fn run_backtest(bars: &[Bar], config: &EngineConfig) -> Result<RunResult, EngineError> {
    config.validate()?;
    validate_bars(bars)?;

    let mut state = EngineState::new(*config);
    for (index, bar) in bars.iter().enumerate() {
        state.on_bar(index, bar);
    }

    let last = bars.len() - 1;
    state.finish(last, &bars[last]);

    let metrics = PerformanceMetrics::compute(&state.trades);
    info!(
        bars = bars.len(),
        trades = metrics.trade_count,
        total_return = metrics.total_return,
        "backtest complete"
    );

    Ok(RunResult {
        trades: state.trades,
        metrics,
        bar_count: bars.len(),
        signal_count: state.signal_count,
    })
}

/// Flat-argument form of [`run_backtest`].
pub fn run(
    bars: &[Bar],
    stop_loss_pct: f64,
    take_profit_pct: f64,
    trade_size: f64,
    commission_pct: f64,
) -> Result<(Vec<TradeRecord>, PerformanceMetrics), EngineError> {
    let config = EngineConfig::new(stop_loss_pct, take_profit_pct, trade_size, commission_pct);
    let result = run_backtest(bars, &config)?;
    Ok((result.trades, result.metrics))
}
