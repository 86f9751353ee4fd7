//! Numerical methods.
//!
//! - [`solvers`]: Root-finding algorithms used by implied volatility

pub mod solvers;
