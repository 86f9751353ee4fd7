//! # options_core: Numerical Foundation for quant-options
//!
//! ## Foundation Layer Role
//!
//! options_core is the bottom layer of the workspace, providing:
//! - Structured error types: `PricingError`, `SolverError` (`types::error`)
//! - Root-finding solvers: Newton-Raphson and Brent (`math::solvers`)
//! - Shared solver configuration: `SolverConfig` (`math::solvers`)
//!
//! ## Zero Dependency Principle
//!
//! This crate has no dependencies on other workspace crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Example
//!
//! ```rust
//! use options_core::math::solvers::{BrentSolver, NewtonRaphsonSolver, SolverConfig};
//!
//! // Newton first, Brent as the bracketing fallback
//! let f = |x: f64| x * x - 2.0;
//! let newton = NewtonRaphsonSolver::new(SolverConfig::default());
//! let root = newton
//!     .find_root(f, |x| 2.0 * x, 1.0)
//!     .or_else(|_| BrentSolver::with_defaults().find_root(f, 0.0, 2.0))
//!     .unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `SolverError`

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod math;
pub mod types;

pub use types::{PricingError, SolverError};
