//! Shared error types.
//!
//! [`SolverError`] is what the root finders return; [`PricingError`] is the
//! coarse classification higher layers convert their own errors into.

use thiserror::Error;

/// Coarse failure classes for pricing and volatility calculations.
///
/// # Examples
/// ```
/// use options_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("strike must be positive, got -5".to_string());
/// assert_eq!(err.to_string(), "Invalid input: strike must be positive, got -5");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// A parameter is out of its domain (non-positive spot, expiry, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The calculation produced a non-finite or degenerate value.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// The model cannot represent the given market data.
    #[error("Model failure: {0}")]
    ModelFailure(String),
}

/// Failures of the Newton-Raphson and Brent root finders.
///
/// # Examples
/// ```
/// use options_core::types::SolverError;
///
/// let err = SolverError::NoBracket { a: 0.01, b: 5.0 };
/// assert!(err.to_string().contains("[0.01, 5]"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Iteration cap reached before the tolerance was met.
    #[error("No convergence within {iterations} iterations")]
    MaxIterationsExceeded {
        /// Iterations performed
        iterations: usize,
    },

    /// Newton step undefined because `f'(x)` vanished.
    #[error("Derivative vanished at x = {x}")]
    DerivativeNearZero {
        /// Iterate at which it happened
        x: f64,
    },

    /// `f(a)` and `f(b)` share a sign, so `[a, b]` holds no guaranteed root.
    #[error("Root not bracketed by [{a}, {b}]")]
    NoBracket {
        /// Lower end
        a: f64,
        /// Upper end
        b: f64,
    },

    /// An iterate or function value was NaN or infinite.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

impl From<SolverError> for PricingError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::NoBracket { .. } => PricingError::InvalidInput(err.to_string()),
            _ => PricingError::NumericalInstability(err.to_string()),
        }
    }
}
