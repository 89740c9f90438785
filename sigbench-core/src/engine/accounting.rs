//! Per-trade PnL accounting.

use crate::domain::PositionSide;

/// Net PnL of a round trip as a percentage of entry notional.
///
/// `gross = exit - entry` (long) or `entry - exit` (short), scaled by
/// `trade_size`. Commission is `commission_pct / 100 * (entry + exit) * trade_size`.
/// Result is `(gross * trade_size - commission) / (entry * trade_size) * 100`.
pub fn pnl_pct(
    side: PositionSide,
    entry_price: f64,
    exit_price: f64,
    trade_size: f64,
    commission_pct: f64,
) -> f64 {
    let gross = match side {
        PositionSide::Long => exit_price - entry_price,
        PositionSide::Short => entry_price - exit_price,
    };
    let commission = commission_pct / 100.0 * (entry_price + exit_price) * trade_size;
    let net = gross * trade_size - commission;
    net / (entry_price * trade_size) * 100.0
}
