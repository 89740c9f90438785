//! Close/open threshold signal: trades in the direction of a large bar body.

use crate::domain::{Bar, Signal};

use super::{check_threshold, SignalError, SignalProvider};

/// Long when the bar's open-to-close move exceeds `threshold_pct`, Short when
/// it falls below `-threshold_pct`.
#[derive(Debug, Clone)]
pub struct CloseOpenThreshold {
    pub threshold_pct: f64,
}

impl CloseOpenThreshold {
    pub fn new(threshold_pct: f64) -> Result<Self, SignalError> {
        check_threshold(threshold_pct)?;
        Ok(Self { threshold_pct })
    }
}

impl SignalProvider for CloseOpenThreshold {
    fn name(&self) -> &str {
        "close_open_threshold"
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn signal_at(&self, bars: &[Bar], index: usize) -> Signal {
        let change = bars[index].body_pct();
        if change > self.threshold_pct {
            Signal::Long
        } else if change < -self.threshold_pct {
            Signal::Short
        } else {
            Signal::Flat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::test_support::oc_bars;

    #[test]
    fn fires_both_directions() {
        let bars = oc_bars(&[(100.0, 100.6), (100.0, 99.4), (100.0, 100.3)]);
        let signals: Vec<Signal> = CloseOpenThreshold::new(0.5)
            .unwrap()
            .annotate(&bars)
            .iter()
            .map(|b| b.signal)
            .collect();
        assert_eq!(signals, vec![Signal::Long, Signal::Short, Signal::Flat]);
    }

    #[test]
    fn threshold_is_strict() {
        let bars = oc_bars(&[(100.0, 100.5)]);
        let provider = CloseOpenThreshold::new(1.0).unwrap();
        assert_eq!(provider.signal_at(&bars, 0), Signal::Flat);
    }

    #[test]
    fn rejects_nan_threshold() {
        assert!(CloseOpenThreshold::new(f64::NAN).is_err());
    }
}
