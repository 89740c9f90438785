//! Position state for the single-position engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bar::Bar;
use super::trade::ExitReason;

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn opposite(self) -> Self {
        match self {
            PositionSide::Long => PositionSide::Short,
            PositionSide::Short => PositionSide::Long,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

/// An open position with its protective levels, fixed at entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub side: PositionSide,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub entry_bar: usize,
    pub entry_time: DateTime<Utc>,
}

impl OpenPosition {
    /// Open at `entry_price` with stop/target `stop_loss_pct` / `take_profit_pct`
    /// percent away from entry.
    pub fn new(
        side: PositionSide,
        entry_price: f64,
        stop_loss_pct: f64,
        take_profit_pct: f64,
        entry_bar: usize,
        entry_time: DateTime<Utc>,
    ) -> Self {
        let sl = stop_loss_pct / 100.0;
        let tp = take_profit_pct / 100.0;
        let (stop_loss, take_profit) = match side {
            PositionSide::Long => (entry_price * (1.0 - sl), entry_price * (1.0 + tp)),
            PositionSide::Short => (entry_price * (1.0 + sl), entry_price * (1.0 - tp)),
        };
        Self {
            side,
            entry_price,
            stop_loss,
            take_profit,
            entry_bar,
            entry_time,
        }
    }

    /// Did the bar's range reach the stop?
    pub fn stop_hit(&self, bar: &Bar) -> bool {
        match self.side {
            PositionSide::Long => bar.low <= self.stop_loss,
            PositionSide::Short => bar.high >= self.stop_loss,
        }
    }

    /// Did the bar's range reach the target?
    pub fn target_hit(&self, bar: &Bar) -> bool {
        match self.side {
            PositionSide::Long => bar.high >= self.take_profit,
            PositionSide::Short => bar.low <= self.take_profit,
        }
    }

    /// Protective exit for this bar, if any, as `(exit_price, reason)`.
    ///
    /// When both levels fall inside the bar's range the stop wins: with only
    /// OHLC available the adverse path is assumed to come first.
    pub fn protective_exit(&self, bar: &Bar) -> Option<(f64, ExitReason)> {
        if self.stop_hit(bar) {
            Some((self.stop_loss, ExitReason::StopLoss))
        } else if self.target_hit(bar) {
            Some((self.take_profit, ExitReason::TakeProfit))
        } else {
            None
        }
    }
}

/// Engine position state. `Flat` carries no prices, so a flat position with
/// a stale entry price cannot be represented.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Flat,
    Open(OpenPosition),
}

impl Position {
    pub fn is_flat(&self) -> bool {
        matches!(self, Position::Flat)
    }

    pub fn side(&self) -> Option<PositionSide> {
        match self {
            Position::Flat => None,
            Position::Open(open) => Some(open.side),
        }
    }

    pub fn as_open(&self) -> Option<&OpenPosition> {
        match self {
            Position::Flat => None,
            Position::Open(open) => Some(open),
        }
    }

    /// Take the open position out, leaving `Flat` behind.
    pub fn take(&mut self) -> Option<OpenPosition> {
        match std::mem::take(self) {
            Position::Flat => None,
            Position::Open(open) => Some(open),
        }
    }
}
