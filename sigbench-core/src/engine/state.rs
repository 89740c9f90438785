//! Mutable per-run state and the run result type.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Bar, ExitReason, OpenPosition, Position, PositionSide, TradeRecord};
use crate::metrics::PerformanceMetrics;

use super::accounting::pnl_pct;
use super::config::EngineConfig;

/// Output of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub trades: Vec<TradeRecord>,
    pub metrics: PerformanceMetrics,
    pub bar_count: usize,
    /// Bars carrying a non-flat signal, whether or not they led to an entry.
    pub signal_count: usize,
}

/// State that evolves bar-by-bar during a run. Owned by exactly one run.
pub struct EngineState {
    config: EngineConfig,
    pub position: Position,
    pub trades: Vec<TradeRecord>,
    pub signal_count: usize,
}

impl EngineState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            position: Position::Flat,
            trades: Vec::new(),
            signal_count: 0,
        }
    }

    /// Advance one bar: protective exits, then reversal, then entry.
    pub fn on_bar(&mut self, index: usize, bar: &Bar) {
        let signal_side = bar.signal.side();
        if signal_side.is_some() {
            self.signal_count += 1;
        }

        if let Some(open) = self.position.as_open() {
            let held = open.side;
            if let Some((price, reason)) = open.protective_exit(bar) {
                self.close(index, bar, price, reason);
                // The bar's signal belonged to the position just closed.
                return;
            }
            match signal_side {
                Some(side) if side != held => {
                    self.close(index, bar, bar.close, ExitReason::Reversal);
                }
                _ => return,
            }
        }

        if let Some(side) = signal_side {
            self.open(index, bar, side);
        }
    }

    /// Force-close anything still open at the last bar's close.
    pub fn finish(&mut self, last_index: usize, last_bar: &Bar) {
        if !self.position.is_flat() {
            self.close(last_index, last_bar, last_bar.close, ExitReason::EndOfData);
        }
    }

    fn open(&mut self, index: usize, bar: &Bar, side: PositionSide) {
        let open = OpenPosition::new(
            side,
            bar.open,
            self.config.stop_loss_pct,
            self.config.take_profit_pct,
            index,
            bar.timestamp,
        );
        debug!(
            bar = index,
            side = side.as_str(),
            entry = open.entry_price,
            stop = open.stop_loss,
            target = open.take_profit,
            "entry"
        );
        self.position = Position::Open(open);
    }

    fn close(&mut self, index: usize, bar: &Bar, exit_price: f64, reason: ExitReason) {
        let Some(open) = self.position.take() else {
            return;
        };
        let pnl = pnl_pct(
            open.side,
            open.entry_price,
            exit_price,
            self.config.trade_size,
            self.config.commission_pct,
        );
        debug!(
            bar = index,
            side = open.side.as_str(),
            exit = exit_price,
            reason = reason.as_str(),
            pnl_pct = pnl,
            "exit"
        );
        self.trades.push(TradeRecord {
            side: open.side,
            entry_bar: open.entry_bar,
            entry_time: open.entry_time,
            entry_price: open.entry_price,
            exit_bar: index,
            exit_time: bar.timestamp,
            exit_price,
            exit_reason: reason,
            pnl_pct: pnl,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal;
    use chrono::{TimeZone, Utc};

    fn bar(hour: u32, o: f64, h: f64, l: f64, c: f64, signal: Signal) -> Bar {
        Bar::new(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(), o, h, l, c)
            .with_signal(signal)
    }

    fn state() -> EngineState {
        EngineState::new(EngineConfig::new(1.0, 2.0, 1.0, 0.0))
    }

    #[test]
    fn flat_signal_keeps_flat() {
        let mut s = state();
        s.on_bar(0, &bar(0, 100.0, 101.0, 99.5, 100.5, Signal::Flat));
        assert!(s.position.is_flat());
        assert_eq!(s.signal_count, 0);
    }

    #[test]
    fn entry_uses_open() {
        let mut s = state();
        s.on_bar(0, &bar(0, 100.0, 100.5, 99.5, 100.2, Signal::Short));
        let open = s.position.as_open().unwrap();
        assert_eq!(open.side, PositionSide::Short);
        assert_eq!(open.entry_price, 100.0);
    }

    #[test]
    fn same_side_signal_is_ignored() {
        let mut s = state();
        s.on_bar(0, &bar(0, 100.0, 100.5, 99.5, 100.2, Signal::Long));
        s.on_bar(1, &bar(1, 100.2, 100.8, 99.8, 100.6, Signal::Long));
        assert_eq!(s.position.as_open().unwrap().entry_bar, 0);
        assert!(s.trades.is_empty());
        assert_eq!(s.signal_count, 2);
    }

    #[test]
    fn no_reentry_after_protective_exit() {
        let mut s = state();
        s.on_bar(0, &bar(0, 100.0, 100.5, 99.5, 100.2, Signal::Long));
        // Stop at 99, bar also carries an opposite signal
        s.on_bar(1, &bar(1, 99.8, 100.0, 98.5, 98.8, Signal::Short));
        assert!(s.position.is_flat());
        assert_eq!(s.trades.len(), 1);
        assert_eq!(s.trades[0].exit_reason, ExitReason::StopLoss);
    }

    #[test]
    fn finish_noop_when_flat() {
        let mut s = state();
        let b = bar(0, 100.0, 101.0, 99.5, 100.5, Signal::Flat);
        s.on_bar(0, &b);
        s.finish(0, &b);
        assert!(s.trades.is_empty());
    }
}
