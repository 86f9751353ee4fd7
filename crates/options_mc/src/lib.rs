//! # Options MC (Simulation Layer)
//!
//! Monte Carlo simulation of underlying prices and option profit and loss.
//!
//! This crate provides:
//! - [`rng`]: Seeded random number generation
//! - [`config`]: Simulation configuration with validation
//! - [`paths`]: Geometric Brownian Motion paths (single, batched, terminal-only)
//! - [`pnl`]: Option PnL under expiry, present-value and opportunity-cost
//!   conventions, with cumulative traces and summary statistics
//! - [`distribution`]: Histograms, lognormal fitting and payoff curves for
//!   terminal price distributions
//!
//! ## Memory Layout
//!
//! Batched paths are stored in row-major order:
//! `values[path_idx * (n_steps + 1) + step_idx]`, where `step_idx = 0` holds
//! the initial spot price.
//!
//! ## Example
//!
//! ```
//! use options_mc::paths::{gbm_terminal_prices, GbmParams};
//! use options_mc::pnl::{PnlConvention, PnlParams, PnlSeries};
//! use options_mc::rng::McRng;
//!
//! let params = GbmParams::new(100.0, 0.04, 0.25, 0.5);
//! let mut rng = McRng::from_seed(42);
//! let terminals = gbm_terminal_prices(&params, 1_000, &mut rng).unwrap();
//!
//! let pnl = PnlSeries::from_terminal_prices(
//!     &terminals,
//!     &PnlParams::new(100.0, 0.04, 0.5, 7.0, 6.0),
//!     PnlConvention::PresentValue,
//! );
//! assert_eq!(pnl.len(), 1_000);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod distribution;
pub mod error;
pub mod paths;
pub mod pnl;
pub mod rng;

pub use config::{SimulationConfig, SimulationConfigBuilder};
pub use error::{ConfigError, SimulationError};
pub use paths::{GbmParams, GbmPath, SimulatedPaths};
pub use pnl::{PnlConvention, PnlParams, PnlSeries, PnlSummary};
pub use rng::McRng;
