//! Backtesting engine: single-position, signal-driven bar scan.
//!
//! The engine consumes bars that already carry a signal and produces a trade
//! ledger plus metrics. Inputs and parameters are validated up front.

pub mod accounting;
pub mod config;
pub mod loop_runner;
pub mod state;
pub mod validate;

pub use accounting::pnl_pct;
pub use config::EngineConfig;
pub use loop_runner::{run, run_backtest};
pub use state::{EngineState, RunResult};
pub use validate::validate_bars;
