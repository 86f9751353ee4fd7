//! Implied volatility from market option prices.
//!
//! Each call quote is inverted independently with a three-stage fallback:
//!
//! 1. Newton-Raphson from an initial guess, using vega as the derivative
//! 2. Brent's method over a fixed volatility bracket if Newton fails or
//!    returns a non-positive volatility
//! 3. A tiny floor volatility if the bracket does not contain a root
//!    (e.g. a quote below intrinsic value)
//!
//! The per-quote vols are then combined into a single vega-weighted average,
//! so near-the-money quotes dominate.
//!
//! ## Example
//!
//! ```
//! use options_models::analytical::BlackScholes;
//! use options_models::implied_vol::vega_weighted_iv;
//!
//! let bs = BlackScholes::new(100.0_f64, 0.04, 0.0, 0.3).unwrap();
//! let strikes = [90.0, 95.0, 100.0, 105.0, 110.0];
//! let quotes: Vec<f64> = strikes.iter().map(|&k| bs.price_call(k, 0.5)).collect();
//!
//! let iv = vega_weighted_iv(&quotes, 100.0, &strikes, 0.04, 0.0, 0.5, 5).unwrap();
//! assert!((iv - 0.3).abs() < 1e-4);
//! ```

mod config;
mod error;
mod solver;

pub use config::ImpliedVolConfig;
pub use error::ImpliedVolError;
pub use solver::{vega_weighted_iv, ImpliedVolResult, ImpliedVolSolver, SolveMethod};
