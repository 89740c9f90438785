//! Bar: the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::signal::Signal;

/// OHLCV bar for a single interval, carrying the signal attached by a provider.
///
/// Volume is informational only; the engine never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub signal: Signal,
}

/// Why a single bar failed the OHLC sanity check.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("high {high} is below max(open, close) = {body_top}")]
    HighBelowBody { high: f64, body_top: f64 },

    #[error("low {low} is above min(open, close) = {body_bottom}")]
    LowAboveBody { low: f64, body_bottom: f64 },
}

impl Bar {
    /// Bar with zero volume and no signal.
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: 0.0,
            signal: Signal::Flat,
        }
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = signal;
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Returns true if any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Full OHLC check: `high >= max(open, close) >= min(open, close) >= low > 0`.
    pub fn check(&self) -> Result<(), BarError> {
        for (field, value) in self.price_fields() {
            if !value.is_finite() {
                return Err(BarError::NonFinite { field });
            }
            if value <= 0.0 {
                return Err(BarError::NonPositive { field, value });
            }
        }

        let body_top = self.open.max(self.close);
        let body_bottom = self.open.min(self.close);
        if self.high < body_top {
            return Err(BarError::HighBelowBody {
                high: self.high,
                body_top,
            });
        }
        if self.low > body_bottom {
            return Err(BarError::LowAboveBody {
                low: self.low,
                body_bottom,
            });
        }
        Ok(())
    }

    pub fn is_sane(&self) -> bool {
        self.check().is_ok()
    }

    /// Percent move from open to close.
    pub fn body_pct(&self) -> f64 {
        (self.close - self.open) / self.open * 100.0
    }

    pub fn is_green(&self) -> bool {
        self.close > self.open
    }

    pub fn is_red(&self) -> bool {
        self.close < self.open
    }

    fn price_fields(&self) -> [(&'static str, f64); 4] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_bar() -> Bar {
        Bar::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            100.0,
            105.0,
            98.0,
            103.0,
        )
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert_eq!(bar.check(), Err(BarError::NonFinite { field: "open" }));
    }

    #[test]
    fn bar_detects_high_below_body() {
        let mut bar = sample_bar();
        bar.high = 102.0; // below close
        assert!(matches!(bar.check(), Err(BarError::HighBelowBody { .. })));
    }

    #[test]
    fn bar_detects_low_above_body() {
        let mut bar = sample_bar();
        bar.low = 100.5; // above open
        assert!(matches!(bar.check(), Err(BarError::LowAboveBody { .. })));
    }

    #[test]
    fn bar_rejects_non_positive_low() {
        let mut bar = sample_bar();
        bar.low = 0.0;
        assert_eq!(
            bar.check(),
            Err(BarError::NonPositive {
                field: "low",
                value: 0.0
            })
        );
    }

    #[test]
    fn doji_with_flat_range_is_sane() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert!(Bar::new(ts, 50.0, 50.0, 50.0, 50.0).is_sane());
    }

    #[test]
    fn body_pct_and_color() {
        let bar = sample_bar();
        assert!((bar.body_pct() - 3.0).abs() < 1e-10);
        assert!(bar.is_green());
        assert!(!bar.is_red());
    }

    #[test]
    fn missing_volume_and_signal_default_on_deserialize() {
        let json = r#"{"timestamp":"2024-01-02T00:00:00Z","open":1.0,"high":2.0,"low":0.5,"close":1.5}"#;
        let bar: Bar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.volume, 0.0);
        assert_eq!(bar.signal, Signal::Flat);
    }
}
