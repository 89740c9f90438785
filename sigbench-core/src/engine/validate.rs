//! Up-front input checks. The engine never starts a scan on bars that fail here.

use crate::domain::Bar;
use crate::error::InputError;

/// Reject empty input, non-increasing timestamps and any bar failing the OHLC check.
///
/// Errors report the first offending bar index.
pub fn validate_bars(bars: &[Bar]) -> Result<(), InputError> {
    if bars.is_empty() {
        return Err(InputError::Empty);
    }

    for (index, bar) in bars.iter().enumerate() {
        bar.check()
            .map_err(|reason| InputError::InvalidBar { index, reason })?;
        if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
            return Err(InputError::NonMonotonicTimestamp { index });
        }
    }
    Ok(())
}
