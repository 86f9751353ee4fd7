//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method root finder.
///
/// Derivative-free; converges for any continuous `f` whose values at the
/// bracket ends differ in sign.
///
/// # Algorithm
///
/// Maintains a bracket `[b, c]` with `f(b)` and `f(c)` of opposite sign and
/// `|f(b)| <= |f(c)|`. Each iteration tries inverse quadratic interpolation
/// (or the secant step when only two distinct points are known) and falls
/// back to bisection whenever the interpolated step would leave the bracket
/// or shrink it too slowly.
///
/// The effective bracket tolerance is `2·ε·|b| + tolerance/2`, so the
/// solver terminates even when `tolerance` is below machine resolution.
///
/// # Example
///
/// ```
/// use options_core::math::solvers::{BrentSolver, SolverConfig};
///
/// // Volatility-like search: flat near zero, steep further out
/// let f = |sigma: f64| (-1.0 / (sigma * sigma)).exp() - 0.25;
///
/// let root = BrentSolver::with_defaults().find_root(f, 1e-3, 5.0).unwrap();
/// assert!(f(root).abs() < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Solver with the given tolerance and iteration cap.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Solver with [`SolverConfig::default`].
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Find a root of `f` in the bracket `[a, b]`.
    ///
    /// The endpoints may be given in either order.
    ///
    /// # Errors
    ///
    /// * `SolverError::NoBracket` - `f(a)` and `f(b)` have the same sign
    /// * `SolverError::NumericalInstability` - `f` is not finite at an endpoint
    /// * `SolverError::MaxIterationsExceeded` - failed to converge
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let zero = T::zero();
        let half = T::from(0.5).unwrap_or_else(|| T::one() / (T::one() + T::one()));
        let two = T::one() + T::one();
        let three = two + T::one();

        let mut a = a;
        let mut b = b;
        let mut fa = f(a);
        let mut fb = f(b);

        if !fa.is_finite() || !fb.is_finite() {
            return Err(SolverError::NumericalInstability(
                "Brent bracket endpoint evaluated to a non-finite value".to_string(),
            ));
        }

        if fa == zero {
            return Ok(a);
        }
        if fb == zero {
            return Ok(b);
        }

        if (fa > zero) == (fb > zero) {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        let mut c = b;
        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.config.max_iterations {
            // Re-establish the bracket [b, c]
            if (fb > zero) == (fc > zero) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }

            // Keep b as the best estimate
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol1 = two * T::epsilon() * b.abs() + half * self.config.tolerance;
            let xm = half * (c - b);

            if xm.abs() <= tol1 || self.config.is_converged(fb) {
                return Ok(b);
            }

            if e.abs() >= tol1 && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    // Secant step
                    (two * xm * s, T::one() - s)
                } else {
                    // Inverse quadratic interpolation
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (two * xm * q * (q - r) - (b - a) * (r - T::one())),
                        (q - T::one()) * (r - T::one()) * (s - T::one()),
                    )
                };

                if p > zero {
                    q = -q;
                }
                p = p.abs();

                let min1 = three * xm * q - (tol1 * q).abs();
                let min2 = (e * q).abs();

                if two * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }

            a = b;
            fa = fb;

            if d.abs() > tol1 {
                b = b + d;
            } else if xm > zero {
                b = b + tol1;
            } else {
                b = b - tol1;
            }

            fb = f(b);
            if !fb.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "Brent iteration evaluated to a non-finite value".to_string(),
                ));
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
