//! Error types for implied volatility.

use options_core::types::PricingError;
use thiserror::Error;

/// Implied volatility errors.
///
/// Solver failures on individual quotes are recovered internally and do
/// not surface here; these cover invalid inputs and degenerate strips.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImpliedVolError {
    /// A pricing parameter is out of range.
    #[error("Invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Fewer quotes or strikes than requested.
    #[error("Insufficient quotes: {required} requested, {available} available")]
    InsufficientQuotes {
        /// Number of options requested
        required: usize,
        /// Number of quotes actually supplied
        available: usize,
    },

    /// Every solved vol has zero vega, so the weighted average is undefined.
    #[error("Total vega is zero across {count} quotes")]
    ZeroTotalVega {
        /// Number of quotes considered
        count: usize,
    },
}

impl From<ImpliedVolError> for PricingError {
    fn from(err: ImpliedVolError) -> Self {
        match err {
            ImpliedVolError::ZeroTotalVega { .. } => {
                PricingError::NumericalInstability(err.to_string())
            }
            _ => PricingError::InvalidInput(err.to_string()),
        }
    }
}
