//! Sigbench Runner: strategy configuration, bar loading and parallel runs.
//!
//! This crate builds on `sigbench-core` to provide:
//! - TOML configuration of named strategies with run fingerprinting
//! - CSV bar loading with a tagged synthetic fallback
//! - Independent per-strategy runs executed in parallel
//! - JSON/CSV artifacts and plain-text reports
//! - Logging setup for binaries

pub mod config;
pub mod data_loader;
pub mod export;
pub mod logging;
pub mod report;
pub mod runner;

pub use config::{ConfigError, DataConfig, RunId, RunnerConfig, StrategyConfig};
pub use data_loader::{load_bars, LoadError, LoadOptions, LoadedData};
pub use export::{export_json, export_trades_csv, import_json, load_artifacts, save_artifacts};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use report::{format_signal_notice, format_summary};
pub use runner::{
    check_latest_signals, run_all, run_strategy, BacktestResult, RunError, SignalCheck,
    StrategyOutcome, SCHEMA_VERSION,
};
