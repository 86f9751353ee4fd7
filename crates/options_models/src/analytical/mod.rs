//! Analytical pricing formulas for European options.
//!
//! This module provides:
//! - Standard normal distribution functions backed by `statrs`
//! - The Black-Scholes model with continuous dividend yield
//! - Vega, used as a weighting factor by implied volatility
//!
//! All formulas are generic over `T: Float`.

pub mod black_scholes;
pub mod distributions;
pub mod error;

pub use black_scholes::{black_scholes_option_price, BlackScholes, OptionPrices};
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
