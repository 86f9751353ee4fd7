//! # Random Number Generation
//!
//! Seeded pseudo-random number generation for Monte Carlo simulation.
//!
//! - **Reproducibility**: the same seed always yields the same sequence
//! - **Efficiency**: batch generation into caller-owned `&mut [f64]` slices
//!
//! ## Usage Example
//!
//! ```rust
//! use options_mc::rng::McRng;
//!
//! let mut rng = McRng::from_seed(12345);
//! let z = rng.gen_normal();
//!
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! # let _ = z;
//! ```

mod prng;

pub use prng::McRng;
