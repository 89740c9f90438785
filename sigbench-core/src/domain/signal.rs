//! Signal: the directional instruction attached to a bar.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::position::PositionSide;

/// Per-bar trading signal. Serialized as the integer `1`, `-1` or `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Signal {
    Long,
    Short,
    #[default]
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("signal value must be -1, 0 or 1, got {0}")]
pub struct SignalValueError(pub i8);

impl Signal {
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Long => 1,
            Signal::Short => -1,
            Signal::Flat => 0,
        }
    }

    pub fn is_flat(self) -> bool {
        self == Signal::Flat
    }

    /// The position side this signal asks for, `None` for `Flat`.
    pub fn side(self) -> Option<PositionSide> {
        match self {
            Signal::Long => Some(PositionSide::Long),
            Signal::Short => Some(PositionSide::Short),
            Signal::Flat => None,
        }
    }
}

impl From<PositionSide> for Signal {
    fn from(side: PositionSide) -> Self {
        match side {
            PositionSide::Long => Signal::Long,
            PositionSide::Short => Signal::Short,
        }
    }
}

impl TryFrom<i8> for Signal {
    type Error = SignalValueError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Signal::Long),
            -1 => Ok(Signal::Short),
            0 => Ok(Signal::Flat),
            other => Err(SignalValueError(other)),
        }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.as_i8()
    }
}
