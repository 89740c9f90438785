//! Signal providers: annotate bars with a per-bar directional signal.
//!
//! Providers are position-agnostic: they see bar history only, never engine
//! state. `annotate` returns the same bars in the same order with only the
//! `signal` field rewritten.

pub mod close_open;
pub mod engulfing;
pub mod ma_spread;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Bar, Signal};

pub use close_open::CloseOpenThreshold;
pub use engulfing::EngulfingReversal;
pub use ma_spread::MaSpreadTurn;

/// Invalid provider parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("threshold_pct must be a finite non-negative number, got {0}")]
    InvalidThreshold(f64),

    #[error("moving average periods must satisfy 1 <= fast < slow, got fast={fast}, slow={slow}")]
    InvalidPeriods { fast: usize, slow: usize },
}

/// Trait for signal providers.
///
/// `signal_at` must only read `bars[..=index]`.
pub trait SignalProvider: Send + Sync {
    /// Human-readable name (e.g. "close_open_threshold").
    fn name(&self) -> &str;

    /// Number of leading bars that are always `Flat`.
    fn warmup_bars(&self) -> usize;

    fn signal_at(&self, bars: &[Bar], index: usize) -> Signal;

    /// Copy of `bars` with every signal replaced by this provider's output.
    fn annotate(&self, bars: &[Bar]) -> Vec<Bar> {
        (0..bars.len())
            .map(|i| bars[i].clone().with_signal(self.signal_at(bars, i)))
            .collect()
    }
}

/// Always `Flat`. Useful as a baseline and in tests.
pub struct NullSignal;

impl SignalProvider for NullSignal {
    fn name(&self) -> &str {
        "null"
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn signal_at(&self, _bars: &[Bar], _index: usize) -> Signal {
        Signal::Flat
    }
}

/// Keeps the signal column the bars already carry, e.g. one read from CSV.
pub struct PrecomputedSignal;

impl SignalProvider for PrecomputedSignal {
    fn name(&self) -> &str {
        "precomputed"
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn signal_at(&self, bars: &[Bar], index: usize) -> Signal {
        bars[index].signal
    }
}

// ── Configuration surface ──

/// Serializable description of a provider and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalKind {
    Null,
    Precomputed,
    CloseOpenThreshold {
        #[serde(default = "default_threshold_pct")]
        threshold_pct: f64,
    },
    EngulfingReversal {
        #[serde(default = "default_threshold_pct")]
        threshold_pct: f64,
    },
    MaSpreadTurn {
        #[serde(default = "default_fast")]
        fast: usize,
        #[serde(default = "default_slow")]
        slow: usize,
    },
}

fn default_threshold_pct() -> f64 {
    0.5
}

fn default_fast() -> usize {
    11
}

fn default_slow() -> usize {
    24
}

impl SignalKind {
    /// Build the provider, rejecting invalid parameters.
    pub fn build(&self) -> Result<Box<dyn SignalProvider>, SignalError> {
        Ok(match *self {
            SignalKind::Null => Box::new(NullSignal),
            SignalKind::Precomputed => Box::new(PrecomputedSignal),
            SignalKind::CloseOpenThreshold { threshold_pct } => {
                Box::new(CloseOpenThreshold::new(threshold_pct)?)
            }
            SignalKind::EngulfingReversal { threshold_pct } => {
                Box::new(EngulfingReversal::new(threshold_pct)?)
            }
            SignalKind::MaSpreadTurn { fast, slow } => Box::new(MaSpreadTurn::new(fast, slow)?),
        })
    }

    /// Every built-in provider type with its default parameters.
    pub fn catalog() -> Vec<(SignalKind, &'static str)> {
        vec![
            (SignalKind::Null, "never signals"),
            (
                SignalKind::Precomputed,
                "uses the signal column supplied with the bars",
            ),
            (
                SignalKind::CloseOpenThreshold {
                    threshold_pct: default_threshold_pct(),
                },
                "bar body beyond threshold: long on up-move, short on down-move",
            ),
            (
                SignalKind::EngulfingReversal {
                    threshold_pct: default_threshold_pct(),
                },
                "strong bar followed by an opposite-colored bar: trade the reversal",
            ),
            (
                SignalKind::MaSpreadTurn {
                    fast: default_fast(),
                    slow: default_slow(),
                },
                "fast/slow SMA spread turns down after rising",
            ),
        ]
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SignalKind::Null => "null",
            SignalKind::Precomputed => "precomputed",
            SignalKind::CloseOpenThreshold { .. } => "close_open_threshold",
            SignalKind::EngulfingReversal { .. } => "engulfing_reversal",
            SignalKind::MaSpreadTurn { .. } => "ma_spread_turn",
        }
    }
}

pub(crate) fn check_threshold(threshold_pct: f64) -> Result<(), SignalError> {
    if !threshold_pct.is_finite() || threshold_pct < 0.0 {
        return Err(SignalError::InvalidThreshold(threshold_pct));
    }
    Ok(())
}

// ── Newest-bar check ──

/// Signal on the newest bar, with the prices a notice reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSignal {
    pub timestamp: DateTime<Utc>,
    pub signal: Signal,
    pub open: f64,
    pub close: f64,
}

/// The last bar's signal, `None` for empty input.
pub fn latest_signal(bars: &[Bar]) -> Option<LatestSignal> {
    bars.last().map(|bar| LatestSignal {
        timestamp: bar.timestamp,
        signal: bar.signal,
        open: bar.open,
        close: bar.close,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{Duration, TimeZone};

    /// Bars from `(open, close)` pairs with a 0.1 wick on each side.
    pub fn oc_bars(rows: &[(f64, f64)]) -> Vec<Bar> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(o, c))| {
                Bar::new(
                    base + Duration::hours(i as i64),
                    o,
                    o.max(c) + 0.1,
                    o.min(c) - 0.1,
                    c,
                )
            })
            .collect()
    }

    pub fn close_bars(closes: &[f64]) -> Vec<Bar> {
        let rows: Vec<(f64, f64)> = closes.iter().map(|&c| (c, c)).collect();
        oc_bars(&rows)
    }
}
