//! # Options Models (Models Layer)
//!
//! Closed-form option pricing and implied volatility.
//!
//! This crate provides:
//! - Standard normal CDF/PDF generic over `num_traits::Float`
//! - Black-Scholes pricing of European calls and puts with a continuous
//!   dividend yield, plus vega
//! - Vega-weighted implied volatility across a strip of call quotes
//!
//! ## Design Principles
//!
//! - **Generic over `T: Float`** for the analytical formulas
//! - **Validated construction**: models reject non-positive spot and
//!   volatility up front
//! - **Recoverable solving**: implied volatility falls back from Newton to
//!   Brent to a floor value instead of failing a whole strip
//!
//! ## Example
//!
//! ```
//! use options_models::analytical::BlackScholes;
//! use options_models::implied_vol::ImpliedVolSolver;
//!
//! let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.25).unwrap();
//! let quote = bs.price_call(105.0, 0.5);
//!
//! let solver = ImpliedVolSolver::default();
//! let (iv, _method) = solver.solve_one(quote, 100.0, 105.0, 0.05, 0.0, 0.5).unwrap();
//! assert!((iv - 0.25).abs() < 1e-4);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod implied_vol;
