//! Solver configuration types.

use num_traits::Float;

/// Configuration for root-finding algorithms.
///
/// Shared by [`NewtonRaphsonSolver`](super::NewtonRaphsonSolver) and
/// [`BrentSolver`](super::BrentSolver).
///
/// # Example
///
/// ```
/// use options_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance < 1e-8);
///
/// // Loose settings as used for implied volatility
/// let iv = SolverConfig::new(1e-6, 100);
/// assert!(iv.is_converged(5e-7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Convergence tolerance.
    ///
    /// Newton stops when `|f(x)|` or the last step falls below it; Brent
    /// stops when `|f(b)|` or the half-bracket falls below it.
    pub tolerance: T,

    /// Maximum number of iterations before giving up with
    /// `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Tolerance 1e-10, 100 iterations.
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap_or_else(T::epsilon),
            max_iterations: 100,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration with specified values.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Tight tolerance (1e-14) and 500 iterations.
    pub fn high_precision() -> Self {
        Self {
            tolerance: T::from(1e-14).unwrap_or_else(T::epsilon),
            max_iterations: 500,
        }
    }

    /// Relaxed tolerance (1e-6) and 50 iterations.
    pub fn fast() -> Self {
        Self {
            tolerance: T::from(1e-6).unwrap_or_else(T::epsilon),
            max_iterations: 50,
        }
    }

    /// Returns a copy with a different iteration cap.
    ///
    /// # Panics
    ///
    /// Panics if `max_iterations == 0`.
    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self::new(self.tolerance, max_iterations)
    }

    /// Whether `residual` is within tolerance.
    #[inline]
    pub fn is_converged(&self, residual: T) -> bool {
        residual.abs() < self.tolerance
    }
}
