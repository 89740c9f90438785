//! TradeRecord: a completed round-trip trade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::position::PositionSide;

/// Why a trade was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// An opposite signal arrived before either level was touched.
    Reversal,
    /// Still open on the last bar; closed at its close.
    EndOfData,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TakeProfit => "take_profit",
            ExitReason::Reversal => "reversal",
            ExitReason::EndOfData => "end_of_data",
        }
    }
}

/// A complete round-trip trade record: entry → exit.
///
/// Records are appended to the ledger once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub side: PositionSide,

    // ── Entry ──
    pub entry_bar: usize,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_bar: usize,
    pub exit_time: DateTime<Utc>,
    pub exit_price: f64,
    pub exit_reason: ExitReason,

    // ── PnL ──
    /// Net return on entry notional, in percent.
    pub pnl_pct: f64,
}

impl TradeRecord {
    /// Closed by the stop-loss level.
    pub fn stop_loss(&self) -> bool {
        self.exit_reason == ExitReason::StopLoss
    }

    /// Closed by the take-profit level.
    pub fn take_profit(&self) -> bool {
        self.exit_reason == ExitReason::TakeProfit
    }

    pub fn bars_held(&self) -> usize {
        self.exit_bar.saturating_sub(self.entry_bar)
    }

    pub fn is_winner(&self) -> bool {
        self.pnl_pct > 0.0
    }
}
