//! Integration tests for the root-finding solvers.
//!
//! Exercises the Newton → Brent chaining used by implied volatility,
//! through the public crate paths only.

use approx::assert_relative_eq;
use options_core::math::solvers::{BrentSolver, NewtonRaphsonSolver, SolverConfig};
use options_core::{PricingError, SolverError};
use proptest::prelude::*;

/// Newton first, Brent on failure. Mirrors how callers chain the solvers.
fn newton_then_brent<F, G>(f: F, f_prime: G, x0: f64, a: f64, b: f64) -> Result<f64, SolverError>
where
    F: Fn(f64) -> f64,
    G: Fn(f64) -> f64,
{
    let newton = NewtonRaphsonSolver::new(SolverConfig::new(1e-10, 50));
    match newton.find_root(&f, &f_prime, x0) {
        Ok(root) => Ok(root),
        Err(_) => BrentSolver::new(SolverConfig::new(1e-12, 200)).find_root(&f, a, b),
    }
}

#[test]
fn test_module_exports() {
    let _: SolverConfig<f64> = SolverConfig::default();
    let _: NewtonRaphsonSolver<f64> = NewtonRaphsonSolver::with_defaults();
    let _: BrentSolver<f64> = BrentSolver::with_defaults();
}

#[test]
fn test_newton_and_brent_agree() {
    let f = |x: f64| x.powi(3) - 2.0 * x - 5.0;
    let f_prime = |x: f64| 3.0 * x * x - 2.0;

    let newton = NewtonRaphsonSolver::new(SolverConfig::default())
        .find_root(f, f_prime, 2.0)
        .unwrap();
    let brent = BrentSolver::new(SolverConfig::default())
        .find_root(f, 2.0, 3.0)
        .unwrap();

    assert_relative_eq!(newton, brent, epsilon = 1e-9);
    assert_relative_eq!(newton, 2.094_551_481_542_327, epsilon = 1e-9);
}

#[test]
fn test_fallback_when_newton_leaves_domain() {
    // ln(x) - 1 = 0 from x0 = 10 overshoots into x < 0 on the first step
    let f = |x: f64| if x > 0.0 { x.ln() - 1.0 } else { f64::NAN };
    let f_prime = |x: f64| if x > 0.0 { 1.0 / x } else { f64::NAN };

    let newton = NewtonRaphsonSolver::new(SolverConfig::default()).find_root(f, f_prime, 10.0);
    assert!(newton.is_err());

    let root = newton_then_brent(f, f_prime, 10.0, 1e-9, 5.0).unwrap();
    assert_relative_eq!(root, std::f64::consts::E, epsilon = 1e-10);
}

#[test]
fn test_fallback_reports_no_bracket() {
    let f = |x: f64| x * x + 1.0;
    let f_prime = |x: f64| 2.0 * x;

    let err = newton_then_brent(f, f_prime, 0.0, -1.0, 1.0).unwrap_err();
    assert!(matches!(err, SolverError::NoBracket { .. }));

    let pricing: PricingError = err.into();
    assert!(matches!(pricing, PricingError::InvalidInput(_)));
}

#[test]
fn test_max_iterations_converts_to_instability() {
    let err = BrentSolver::new(SolverConfig::new(1e-100, 2))
        .find_root(|x: f64| x - x.cos(), 0.0, 1.0)
        .unwrap_err();

    let pricing: PricingError = err.into();
    assert!(matches!(pricing, PricingError::NumericalInstability(_)));
}

proptest! {
    #[test]
    fn prop_brent_finds_cube_root(target in 0.01_f64..1000.0) {
        let f = |x: f64| x * x * x - target;
        let root = BrentSolver::new(SolverConfig::new(1e-12, 200))
            .find_root(f, 0.0, 11.0)
            .unwrap();
        prop_assert!((root - target.cbrt()).abs() < 1e-8);
    }

    #[test]
    fn prop_newton_finds_square_root(target in 0.01_f64..1.0e4) {
        let root = NewtonRaphsonSolver::new(SolverConfig::default())
            .find_root(|x: f64| x * x - target, |x: f64| 2.0 * x, target.max(1.0))
            .unwrap();
        prop_assert!((root - target.sqrt()).abs() < 1e-8);
    }
}
