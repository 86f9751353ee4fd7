//! Newton-Raphson root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Newton-Raphson root finder.
///
/// Uses Newton's method: `x_{n+1} = x_n - f(x_n) / f'(x_n)` for fast
/// quadratic convergence on smooth functions.
///
/// # Convergence
///
/// Iteration stops successfully when either `|f(x)| < tolerance` or the
/// Newton step satisfies `|Δx| < tolerance`. It fails if:
/// - The derivative is near zero
/// - An iterate becomes non-finite (e.g. the function left its domain
///   and returned NaN)
/// - The iteration cap is reached
///
/// # Example
///
/// ```
/// use options_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
///
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0
/// let f = |x: f64| x * x * x - x - 2.0;
/// let f_prime = |x: f64| 3.0 * x * x - 1.0;
///
/// let root = solver.find_root(f, f_prime, 1.5).unwrap();
/// assert!(f(root).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> NewtonRaphsonSolver<T> {
    /// Create a new Newton-Raphson solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Find a root of `f` using explicit derivative `f_prime`, starting
    /// from `x0`.
    ///
    /// # Errors
    ///
    /// * `SolverError::DerivativeNearZero` - `|f'(x)|` below 1e-30
    /// * `SolverError::NumericalInstability` - an iterate was NaN or infinite
    /// * `SolverError::MaxIterationsExceeded` - failed to converge
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
    {
        let epsilon = T::from(1e-30).unwrap_or_else(T::min_positive_value);
        let mut x = x0;

        for _ in 0..self.config.max_iterations {
            let f_val = f(x);
            if self.config.is_converged(f_val) {
                return Ok(x);
            }

            let f_prime_val = f_prime(x);
            if f_prime_val.abs() < epsilon {
                return Err(SolverError::DerivativeNearZero {
                    x: x.to_f64().unwrap_or(f64::NAN),
                });
            }

            let step = f_val / f_prime_val;
            x = x - step;

            if !x.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "Newton iteration produced non-finite value".to_string(),
                ));
            }

            if self.config.is_converged(step) {
                return Ok(x);
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}
