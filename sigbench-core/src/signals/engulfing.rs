//! Engulfing reversal signal.
//!
//! A strong up bar followed by a red bar fires Short; a strong down bar
//! followed by a green bar fires Long.

use crate::domain::{Bar, Signal};

use super::{check_threshold, SignalError, SignalProvider};

#[derive(Debug, Clone)]
pub struct EngulfingReversal {
    /// Minimum previous-bar body, in percent of the smaller of open/close.
    pub threshold_pct: f64,
}

impl EngulfingReversal {
    pub fn new(threshold_pct: f64) -> Result<Self, SignalError> {
        check_threshold(threshold_pct)?;
        Ok(Self { threshold_pct })
    }
}

impl SignalProvider for EngulfingReversal {
    fn name(&self) -> &str {
        "engulfing_reversal"
    }

    fn warmup_bars(&self) -> usize {
        1
    }

    fn signal_at(&self, bars: &[Bar], index: usize) -> Signal {
        if index < self.warmup_bars() {
            return Signal::Flat;
        }
        let prev = &bars[index - 1];
        let bar = &bars[index];
        let factor = 1.0 + self.threshold_pct / 100.0;

        if prev.close > prev.open * factor && bar.is_red() {
            Signal::Short
        } else if prev.open > prev.close * factor && bar.is_green() {
            Signal::Long
        } else {
            Signal::Flat
        }
    }
}
