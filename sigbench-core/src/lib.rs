//! Sigbench Core: domain types, signal providers, the backtest engine and metrics.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, signals, positions, trades)
//! - Single-position bar scan with stop-first protective exits
//! - Per-trade PnL accounting and ledger metrics
//! - Signal provider trait and built-in providers

pub mod domain;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod signals;

pub use domain::{Bar, ExitReason, Position, PositionSide, Signal, TradeRecord};
pub use engine::{run, run_backtest, EngineConfig, RunResult};
pub use error::{EngineError, InputError, ParameterError};
pub use metrics::PerformanceMetrics;
pub use signals::{latest_signal, LatestSignal, SignalKind, SignalProvider};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all public core types are Send + Sync, so
    /// independent runs can move across worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::OpenPosition>();
        require_sync::<domain::OpenPosition>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();

        // Engine types
        require_send::<engine::EngineConfig>();
        require_sync::<engine::EngineConfig>();
        require_send::<engine::RunResult>();
        require_sync::<engine::RunResult>();
        require_send::<engine::EngineState>();
        require_sync::<engine::EngineState>();
        require_send::<metrics::PerformanceMetrics>();
        require_sync::<metrics::PerformanceMetrics>();
        require_send::<error::EngineError>();
        require_sync::<error::EngineError>();

        // Signal types
        require_send::<signals::SignalKind>();
        require_sync::<signals::SignalKind>();
        require_send::<signals::LatestSignal>();
        require_sync::<signals::LatestSignal>();
        require_send::<Box<dyn signals::SignalProvider>>();
        require_sync::<Box<dyn signals::SignalProvider>>();
    }

    /// Architecture contract: providers see bars only, never engine state.
    #[test]
    fn signal_provider_has_no_position_parameter() {
        fn _check_trait_object_builds(
            provider: &dyn signals::SignalProvider,
            bars: &[domain::Bar],
        ) -> domain::Signal {
            provider.signal_at(bars, 0)
        }
    }
}
