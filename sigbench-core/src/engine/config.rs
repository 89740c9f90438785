//! Per-strategy engine parameters.

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Parameters for a single backtest run. All percentages are in percent
/// units (`1.0` = 1%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum adverse move from entry before the stop closes the trade.
    pub stop_loss_pct: f64,
    /// Favorable move from entry at which the target closes the trade.
    pub take_profit_pct: f64,
    /// Multiplier applied to PnL. Does not affect triggering.
    #[serde(default = "default_trade_size")]
    pub trade_size: f64,
    /// Charged on both entry and exit notional.
    #[serde(default)]
    pub commission_pct: f64,
}

fn default_trade_size() -> f64 {
    1.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stop_loss_pct: 1.0,
            take_profit_pct: 2.5,
            trade_size: 1.0,
            commission_pct: 0.0,
        }
    }
}

impl EngineConfig {
    pub fn new(
        stop_loss_pct: f64,
        take_profit_pct: f64,
        trade_size: f64,
        commission_pct: f64,
    ) -> Self {
        Self {
            stop_loss_pct,
            take_profit_pct,
            trade_size,
            commission_pct,
        }
    }

    /// Reject non-finite values, non-positive stop/target/size and negative
    /// commission.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let positive = [
            ("stop_loss_pct", self.stop_loss_pct),
            ("take_profit_pct", self.take_profit_pct),
            ("trade_size", self.trade_size),
        ];
        for (name, value) in positive {
            if !value.is_finite() {
                return Err(ParameterError::NotFinite { name });
            }
            if value <= 0.0 {
                return Err(ParameterError::NonPositive { name, value });
            }
        }

        if !self.commission_pct.is_finite() {
            return Err(ParameterError::NotFinite {
                name: "commission_pct",
            });
        }
        if self.commission_pct < 0.0 {
            return Err(ParameterError::Negative {
                name: "commission_pct",
                value: self.commission_pct,
            });
        }
        Ok(())
    }
}
