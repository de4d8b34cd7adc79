//! Error types for freshpoint-forecast

use thiserror::Error;

/// Forecasting errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("Invalid timestamp at index {index}: '{timestamp}'")]
    InvalidTimestamp { index: usize, timestamp: String },

    #[error("Value {value} at output index {index} is not representable as an integer")]
    UnrepresentableValue { index: usize, value: f64 },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("future_weeks {requested} exceeds the maximum of {max}")]
    HorizonTooLong { requested: usize, max: usize },
}

impl ForecastError {
    pub fn invalid_timestamp(index: usize, timestamp: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            index,
            timestamp: timestamp.into(),
        }
    }

    pub fn unrepresentable(index: usize, value: f64) -> Self {
        Self::UnrepresentableValue { index, value }
    }

    pub fn date_out_of_range(msg: impl Into<String>) -> Self {
        Self::DateOutOfRange(msg.into())
    }

    /// Whether the error was caused by caller input rather than by the computation
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimestamp { .. } | Self::DateOutOfRange(_) | Self::HorizonTooLong { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
