//! Moving average spread turn signal.
//!
//! With `diff = sma(fast) - sma(slow)` of closes, fires when the spread turns
//! down after rising (`diff[i] < diff[i-1]` and `diff[i-1] > diff[i-2]`):
//! Short while fast is above slow, Long while fast is below slow.

use crate::domain::{Bar, Signal};

use super::{SignalError, SignalProvider};

#[derive(Debug, Clone)]
pub struct MaSpreadTurn {
    pub fast: usize,
    pub slow: usize,
}

impl MaSpreadTurn {
    pub fn new(fast: usize, slow: usize) -> Result<Self, SignalError> {
        if fast == 0 || slow <= fast {
            return Err(SignalError::InvalidPeriods { fast, slow });
        }
        Ok(Self { fast, slow })
    }

    fn spread(&self, bars: &[Bar], index: usize) -> (f64, f64, f64) {
        let fast = sma(bars, index, self.fast);
        let slow = sma(bars, index, self.slow);
        (fast, slow, fast - slow)
    }
}

impl Default for MaSpreadTurn {
    fn default() -> Self {
        Self { fast: 11, slow: 24 }
    }
}

impl SignalProvider for MaSpreadTurn {
    fn name(&self) -> &str {
        "ma_spread_turn"
    }

    /// The slow average first exists at `slow - 1`; two more bars are needed
    /// to see a turn.
    fn warmup_bars(&self) -> usize {
        self.slow + 1
    }

    fn signal_at(&self, bars: &[Bar], index: usize) -> Signal {
        if index < self.warmup_bars() {
            return Signal::Flat;
        }
        let (fast, slow, diff) = self.spread(bars, index);
        let (_, _, diff_1) = self.spread(bars, index - 1);
        let (_, _, diff_2) = self.spread(bars, index - 2);

        if !(diff < diff_1 && diff_1 > diff_2) {
            return Signal::Flat;
        }
        if fast > slow {
            Signal::Short
        } else if fast < slow {
            Signal::Long
        } else {
            Signal::Flat
        }
    }
}

/// Simple moving average of closes over `bars[end + 1 - period..=end]`.
fn sma(bars: &[Bar], end: usize, period: usize) -> f64 {
    let window = &bars[end + 1 - period..=end];
    window.iter().map(|b| b.close).sum::<f64>() / period as f64
}
