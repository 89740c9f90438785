//! Performance metrics: pure functions over the trade ledger.
//!
//! Every metric is a pure function: trade list in, scalar out. All returns are
//! per-trade PnL percentages, so sums and means stay in percent units.

use serde::{Deserialize, Serialize};

use crate::domain::TradeRecord;

/// Aggregate statistics for one run. An empty ledger yields all zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Sum of per-trade PnL%.
    pub total_return: f64,
    /// Percentage of trades with positive PnL (e.g. 66.67).
    pub win_rate: f64,
    pub trade_count: usize,
    /// Mean PnL% per trade.
    pub avg_trade: f64,
    /// Mean PnL% over its population standard deviation.
    pub sharpe: f64,
    pub profit_factor: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    pub stop_loss_exits: usize,
    pub take_profit_exits: usize,
}

impl PerformanceMetrics {
    pub fn compute(trades: &[TradeRecord]) -> Self {
        Self {
            total_return: total_return(trades),
            win_rate: win_rate(trades),
            trade_count: trades.len(),
            avg_trade: avg_trade(trades),
            sharpe: sharpe_ratio(trades),
            profit_factor: profit_factor(trades),
            max_consecutive_wins: max_consecutive_wins(trades),
            max_consecutive_losses: max_consecutive_losses(trades),
            stop_loss_exits: trades.iter().filter(|t| t.stop_loss()).count(),
            take_profit_exits: trades.iter().filter(|t| t.take_profit()).count(),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

pub fn total_return(trades: &[TradeRecord]) -> f64 {
    trades.iter().map(|t| t.pnl_pct).sum()
}

/// Percentage of winning trades, 0.0 for an empty ledger.
pub fn win_rate(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64 * 100.0
}

pub fn avg_trade(trades: &[TradeRecord]) -> f64 {
    mean_f64(&pnl_series(trades))
}

/// Sharpe-like ratio: mean PnL% / population std of PnL%.
///
/// Returns 0.0 for an empty ledger or zero variance. Variance is treated as
/// zero when the std is within rounding noise of the mean's magnitude.
pub fn sharpe_ratio(trades: &[TradeRecord]) -> f64 {
    let pnl = pnl_series(trades);
    if pnl.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(&pnl);
    let std = population_std(&pnl);
    if std <= 1e-9 * mean.abs().max(1.0) {
        return 0.0;
    }
    mean / std
}

/// Profit factor: gross winning PnL% / |gross losing PnL%|.
///
/// Capped at 100.0 when there are no losses.
pub fn profit_factor(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let gross_profit: f64 = trades
        .iter()
        .filter(|t| t.pnl_pct > 0.0)
        .map(|t| t.pnl_pct)
        .sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.pnl_pct < 0.0)
        .map(|t| t.pnl_pct.abs())
        .sum();

    if gross_loss < 1e-10 {
        return if gross_profit > 0.0 { 100.0 } else { 0.0 };
    }
    (gross_profit / gross_loss).min(100.0)
}

pub fn max_consecutive_wins(trades: &[TradeRecord]) -> usize {
    max_consecutive(trades, true)
}

pub fn max_consecutive_losses(trades: &[TradeRecord]) -> usize {
    max_consecutive(trades, false)
}

// ─── Helpers ────────────────────────────────────────────────────────

pub fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population (divide-by-n) standard deviation.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn pnl_series(trades: &[TradeRecord]) -> Vec<f64> {
    trades.iter().map(|t| t.pnl_pct).collect()
}

fn max_consecutive(trades: &[TradeRecord], winners: bool) -> usize {
    let mut max_streak = 0;
    let mut current = 0;

    for trade in trades {
        if trade.is_winner() == winners {
            current += 1;
            max_streak = max_streak.max(current);
        } else {
            current = 0;
        }
    }
    max_streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExitReason, PositionSide};
    use chrono::{TimeZone, Utc};

    fn make_trade(pnl_pct: f64, exit_reason: ExitReason) -> TradeRecord {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        TradeRecord {
            side: PositionSide::Long,
            entry_bar: 0,
            entry_time: ts,
            entry_price: 100.0,
            exit_bar: 3,
            exit_time: ts,
            exit_price: 100.0 + pnl_pct,
            exit_reason,
            pnl_pct,
        }
    }

    fn ledger(pnls: &[f64]) -> Vec<TradeRecord> {
        pnls.iter()
            .map(|&p| make_trade(p, ExitReason::Reversal))
            .collect()
    }

    // ── Aggregate ──

    #[test]
    fn three_trade_ledger() {
        let m = PerformanceMetrics::compute(&ledger(&[1.0, -1.0, 2.0]));
        assert!((m.total_return - 2.0).abs() < 1e-10);
        assert!((m.win_rate - 66.67).abs() < 0.01);
        assert_eq!(m.trade_count, 3);
        assert!((m.avg_trade - 2.0 / 3.0).abs() < 1e-10);

        let avg: f64 = 2.0 / 3.0;
        let var = ((1.0 - avg).powi(2) + (-1.0 - avg).powi(2) + (2.0 - avg).powi(2)) / 3.0;
        assert!((m.sharpe - avg / var.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn empty_ledger_all_zero() {
        assert_eq!(PerformanceMetrics::compute(&[]), PerformanceMetrics::default());
    }

    // ── Sharpe ──

    #[test]
    fn sharpe_zero_variance() {
        assert_eq!(sharpe_ratio(&ledger(&[0.5, 0.5, 0.5])), 0.0);
    }

    #[test]
    fn sharpe_rounding_noise_is_zero_variance() {
        let pnls = [2.0, 2.000_000_000_000_012, 2.000_000_000_000_004, 1.999_999_999_999_998];
        assert_eq!(sharpe_ratio(&ledger(&pnls)), 0.0);
    }

    #[test]
    fn sharpe_small_real_spread_is_nonzero() {
        assert!(sharpe_ratio(&ledger(&[0.01, 0.02, 0.015])) > 0.0);
    }

    #[test]
    fn sharpe_single_trade_is_zero() {
        assert_eq!(sharpe_ratio(&ledger(&[1.5])), 0.0);
    }

    #[test]
    fn sharpe_negative_mean() {
        assert!(sharpe_ratio(&ledger(&[-1.0, -2.0, 0.5])) < 0.0);
    }

    // ── Win rate / profit factor ──

    #[test]
    fn zero_pnl_is_not_a_win() {
        assert_eq!(win_rate(&ledger(&[0.0, 1.0])), 50.0);
    }

    #[test]
    fn profit_factor_basic() {
        assert!((profit_factor(&ledger(&[3.0, -1.0, -0.5])) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn profit_factor_capped_without_losses() {
        assert_eq!(profit_factor(&ledger(&[1.0, 2.0])), 100.0);
        assert_eq!(profit_factor(&ledger(&[0.0])), 0.0);
    }

    // ── Streaks and exit counts ──

    #[test]
    fn streaks() {
        let trades = ledger(&[1.0, 1.0, -1.0, -1.0, -1.0, 2.0]);
        assert_eq!(max_consecutive_wins(&trades), 2);
        assert_eq!(max_consecutive_losses(&trades), 3);
    }

    #[test]
    fn exit_counts() {
        let trades = vec![
            make_trade(-1.0, ExitReason::StopLoss),
            make_trade(2.5, ExitReason::TakeProfit),
            make_trade(-1.0, ExitReason::StopLoss),
            make_trade(0.3, ExitReason::EndOfData),
        ];
        let m = PerformanceMetrics::compute(&trades);
        assert_eq!(m.stop_loss_exits, 2);
        assert_eq!(m.take_profit_exits, 1);
    }

    // ── Helpers ──

    #[test]
    fn population_std_divides_by_n() {
        assert!((population_std(&[1.0, 3.0]) - 1.0).abs() < 1e-10);
        assert_eq!(population_std(&[]), 0.0);
    }
}
