//! Engine error taxonomy.
//!
//! Two families, both raised before the first bar is simulated:
//! malformed bar input and out-of-range run parameters.

use thiserror::Error;

use crate::domain::BarError;

/// Malformed bar sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("bar sequence is empty")]
    Empty,

    #[error("timestamp at bar {index} is not after the previous bar's")]
    NonMonotonicTimestamp { index: usize },

    #[error("bar {index} is malformed: {reason}")]
    InvalidBar { index: usize, reason: BarError },
}

/// Run parameter outside its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} is not a finite number")]
    NotFinite { name: &'static str },
}

/// Any error returned by the engine entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),
}

impl EngineError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }
}
