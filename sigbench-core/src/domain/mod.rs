//! Domain types: bars, signals, positions, trades.

pub mod bar;
pub mod position;
pub mod signal;
pub mod trade;

pub use bar::{Bar, BarError};
pub use position::{OpenPosition, Position, PositionSide};
pub use signal::{Signal, SignalValueError};
pub use trade::{ExitReason, TradeRecord};
