//! Newton → Brent → floor implied volatility solver.

use std::fmt;

use options_core::math::solvers::{BrentSolver, NewtonRaphsonSolver};

use super::config::ImpliedVolConfig;
use super::error::ImpliedVolError;
use crate::analytical::BlackScholes;

/// Which stage produced an implied volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveMethod {
    /// Newton-Raphson converged to a positive volatility.
    Newton,
    /// Newton failed; Brent found a root inside the bracket.
    Brent,
    /// No root in the bracket; the floor volatility was used.
    Floor,
}

impl fmt::Display for SolveMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveMethod::Newton => write!(f, "newton"),
            SolveMethod::Brent => write!(f, "brent"),
            SolveMethod::Floor => write!(f, "floor"),
        }
    }
}

/// Per-quote solutions and their vega-weighted average.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVolResult {
    /// Implied volatility per quote.
    pub vols: Vec<f64>,
    /// Vega evaluated at each solved volatility.
    pub vegas: Vec<f64>,
    /// Stage that produced each volatility.
    pub methods: Vec<SolveMethod>,
    /// `Σ iv·vega / Σ vega`.
    pub weighted: f64,
}

impl ImpliedVolResult {
    /// Number of quotes that needed a fallback stage.
    pub fn fallback_count(&self) -> usize {
        self.methods
            .iter()
            .filter(|m| **m != SolveMethod::Newton)
            .count()
    }
}

/// Implied volatility solver for European call quotes.
///
/// # Example
///
/// ```
/// use options_models::implied_vol::{ImpliedVolSolver, SolveMethod};
///
/// let solver = ImpliedVolSolver::default();
///
/// // 10.4506 is the Black-Scholes call at σ = 20%
/// let (iv, method) = solver
///     .solve_one(10.450_583_572_185_565, 100.0, 100.0, 0.05, 0.0, 1.0)
///     .unwrap();
/// assert!((iv - 0.2).abs() < 1e-6);
/// assert_eq!(method, SolveMethod::Newton);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImpliedVolSolver {
    config: ImpliedVolConfig,
}

impl ImpliedVolSolver {
    /// Creates a solver.
    ///
    /// # Errors
    /// `ImpliedVolError::InvalidParameter` if the config does not validate.
    pub fn new(config: ImpliedVolConfig) -> Result<Self, ImpliedVolError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &ImpliedVolConfig {
        &self.config
    }

    /// Solves for the volatility that reprices one call quote.
    ///
    /// Never fails on solver trouble: Newton failures fall through to
    /// Brent, and Brent failures to the configured floor.
    ///
    /// # Errors
    /// `ImpliedVolError::InvalidParameter` if `spot`, `strike` or `expiry`
    /// is not strictly positive, or `market_price` is not finite.
    pub fn solve_one(
        &self,
        market_price: f64,
        spot: f64,
        strike: f64,
        rate: f64,
        dividend_yield: f64,
        expiry: f64,
    ) -> Result<(f64, SolveMethod), ImpliedVolError> {
        check_positive("spot", spot)?;
        check_positive("strike", strike)?;
        check_positive("expiry", expiry)?;
        if !market_price.is_finite() {
            return Err(ImpliedVolError::InvalidParameter {
                name: "market_price",
                value: market_price,
            });
        }

        // Non-positive σ cannot be priced; NaN makes the solvers bail out.
        let diff = |sigma: f64| {
            BlackScholes::new(spot, rate, dividend_yield, sigma)
                .map(|bs| bs.price_call(strike, expiry) - market_price)
                .unwrap_or(f64::NAN)
        };
        let vega = |sigma: f64| {
            BlackScholes::new(spot, rate, dividend_yield, sigma)
                .map(|bs| bs.vega(strike, expiry))
                .unwrap_or(f64::NAN)
        };

        let newton = NewtonRaphsonSolver::new(self.config.newton);
        match newton.find_root(diff, vega, self.config.sigma_init) {
            Ok(iv) if iv > 0.0 => return Ok((iv, SolveMethod::Newton)),
            Ok(iv) => {
                tracing::debug!(strike, iv, "Newton returned non-positive vol, trying Brent");
            }
            Err(err) => {
                tracing::debug!(strike, error = %err, "Newton failed, trying Brent");
            }
        }

        let brent = BrentSolver::new(self.config.brent);
        match brent.find_root(diff, self.config.bracket_lower, self.config.bracket_upper) {
            Ok(iv) => Ok((iv, SolveMethod::Brent)),
            Err(err) => {
                tracing::debug!(
                    strike,
                    market_price,
                    error = %err,
                    floor = self.config.floor,
                    "Brent failed, using floor volatility"
                );
                Ok((self.config.floor, SolveMethod::Floor))
            }
        }
    }

    /// Solves the first `num_options` quotes and vega-weights the result.
    ///
    /// # Arguments
    /// * `call_prices` - Market call prices
    /// * `spot` - Current stock price
    /// * `strikes` - Strike per call price
    /// * `rate` - Risk-free rate
    /// * `dividend_yield` - Dividend yield
    /// * `expiry` - Time to expiry in years, shared by all quotes
    /// * `num_options` - How many leading quotes to use
    ///
    /// # Errors
    /// - `ImpliedVolError::InvalidParameter` on non-positive `num_options`,
    ///   spot or expiry
    /// - `ImpliedVolError::InsufficientQuotes` if either slice is shorter
    ///   than `num_options`
    /// - `ImpliedVolError::ZeroTotalVega` if every solved vol has zero vega
    #[allow(clippy::too_many_arguments)]
    pub fn vega_weighted(
        &self,
        call_prices: &[f64],
        spot: f64,
        strikes: &[f64],
        rate: f64,
        dividend_yield: f64,
        expiry: f64,
        num_options: usize,
    ) -> Result<ImpliedVolResult, ImpliedVolError> {
        if num_options == 0 {
            return Err(ImpliedVolError::InvalidParameter {
                name: "num_options",
                value: 0.0,
            });
        }
        let available = call_prices.len().min(strikes.len());
        if available < num_options {
            return Err(ImpliedVolError::InsufficientQuotes {
                required: num_options,
                available,
            });
        }

        let mut vols = Vec::with_capacity(num_options);
        let mut vegas = Vec::with_capacity(num_options);
        let mut methods = Vec::with_capacity(num_options);

        for (&price, &strike) in call_prices.iter().zip(strikes).take(num_options) {
            let (iv, method) =
                self.solve_one(price, spot, strike, rate, dividend_yield, expiry)?;
            let vega = BlackScholes::new(spot, rate, dividend_yield, iv)
                .map(|bs| bs.vega(strike, expiry))
                .unwrap_or(0.0);

            vols.push(iv);
            vegas.push(vega);
            methods.push(method);
        }

        let total_vega: f64 = vegas.iter().sum();
        if !(total_vega > 0.0) {
            return Err(ImpliedVolError::ZeroTotalVega { count: num_options });
        }
        let weighted = vols.iter().zip(&vegas).map(|(iv, v)| iv * v).sum::<f64>() / total_vega;

        tracing::debug!(
            weighted,
            quotes = num_options,
            fallbacks = methods.iter().filter(|m| **m != SolveMethod::Newton).count(),
            "Vega-weighted implied volatility"
        );

        Ok(ImpliedVolResult {
            vols,
            vegas,
            methods,
            weighted,
        })
    }
}

/// Vega-weighted implied volatility with default solver settings.
///
/// See [`ImpliedVolSolver::vega_weighted`] for arguments and errors.
#[allow(clippy::too_many_arguments)]
pub fn vega_weighted_iv(
    call_prices: &[f64],
    spot: f64,
    strikes: &[f64],
    rate: f64,
    dividend_yield: f64,
    expiry: f64,
    num_options: usize,
) -> Result<f64, ImpliedVolError> {
    ImpliedVolSolver::default()
        .vega_weighted(
            call_prices,
            spot,
            strikes,
            rate,
            dividend_yield,
            expiry,
            num_options,
        )
        .map(|result| result.weighted)
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ImpliedVolError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ImpliedVolError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn call(spot: f64, strike: f64, rate: f64, q: f64, expiry: f64, vol: f64) -> f64 {
        BlackScholes::new(spot, rate, q, vol)
            .unwrap()
            .price_call(strike, expiry)
    }

    // ==========================================================
    // solve_one tests
    // ==========================================================

    #[test]
    fn test_round_trip_newton() {
        let solver = ImpliedVolSolver::default();
        for (strike, vol) in [(90.0, 0.15), (100.0, 0.2), (110.0, 0.35), (120.0, 0.5)] {
            let price = call(100.0, strike, 0.04, 0.01, 0.75, vol);
            let (iv, method) = solver
                .solve_one(price, 100.0, strike, 0.04, 0.01, 0.75)
                .unwrap();
            assert_relative_eq!(iv, vol, epsilon = 1e-5);
            assert_eq!(method, SolveMethod::Newton);
        }
    }

    #[test]
    fn test_flat_vega_falls_back_to_brent() {
        // Vega at σ = 0.1 is ~1e-40 for this deep OTM strike
        let solver = ImpliedVolSolver::default();
        let price = call(100.0, 200.0, 0.04, 0.0, 0.25, 1.5);

        let (iv, method) = solver
            .solve_one(price, 100.0, 200.0, 0.04, 0.0, 0.25)
            .unwrap();
        assert_eq!(method, SolveMethod::Brent);
        assert_relative_eq!(iv, 1.5, epsilon = 1e-8);
    }

    #[test]
    fn test_below_intrinsic_returns_floor() {
        let solver = ImpliedVolSolver::default();

        let (iv, method) = solver.solve_one(5.0, 100.0, 80.0, 0.04, 0.0, 1.0).unwrap();
        assert_eq!(method, SolveMethod::Floor);
        assert_eq!(iv, 1e-9);
    }

    #[test]
    fn test_above_bracket_returns_floor() {
        // A call is worth at most the spot; 150 is unreachable for any σ
        let solver = ImpliedVolSolver::default();

        let (iv, method) = solver
            .solve_one(150.0, 100.0, 100.0, 0.04, 0.0, 1.0)
            .unwrap();
        assert_eq!(method, SolveMethod::Floor);
        assert_eq!(iv, solver.config().floor);
    }

    #[test]
    fn test_custom_floor() {
        let config = ImpliedVolConfig::default().with_floor(1e-4);
        let solver = ImpliedVolSolver::new(config).unwrap();

        let (iv, _) = solver.solve_one(0.5, 100.0, 60.0, 0.04, 0.0, 1.0).unwrap();
        assert_eq!(iv, 1e-4);
    }

    #[test]
    fn test_solve_one_rejects_invalid_inputs() {
        let solver = ImpliedVolSolver::default();
        let cases = [
            (10.0, 0.0, 100.0, 1.0, "spot"),
            (10.0, 100.0, -1.0, 1.0, "strike"),
            (10.0, 100.0, 100.0, 0.0, "expiry"),
            (f64::NAN, 100.0, 100.0, 1.0, "market_price"),
        ];
        for (price, spot, strike, expiry, field) in cases {
            match solver.solve_one(price, spot, strike, 0.04, 0.0, expiry) {
                Err(ImpliedVolError::InvalidParameter { name, .. }) => assert_eq!(name, field),
                other => panic!("Expected InvalidParameter for {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ImpliedVolConfig::default().with_bracket(0.0, 5.0);
        assert!(ImpliedVolSolver::new(config).is_err());
    }

    // ==========================================================
    // vega_weighted tests
    // ==========================================================

    #[test]
    fn test_flat_smile_recovers_vol() {
        let strikes = [90.0, 95.0, 100.0, 105.0, 110.0];
        let prices: Vec<f64> = strikes
            .iter()
            .map(|&k| call(100.0, k, 0.04, 0.005, 0.4, 0.27))
            .collect();

        let result = ImpliedVolSolver::default()
            .vega_weighted(&prices, 100.0, &strikes, 0.04, 0.005, 0.4, 5)
            .unwrap();
        assert_eq!(result.vols.len(), 5);
        assert_eq!(result.fallback_count(), 0);
        assert_relative_eq!(result.weighted, 0.27, epsilon = 1e-5);
    }

    #[test]
    fn test_weighted_between_min_and_max() {
        let strikes = [90.0, 95.0, 100.0, 105.0, 110.0];
        let smile = [0.32, 0.28, 0.25, 0.24, 0.26];
        let prices: Vec<f64> = strikes
            .iter()
            .zip(smile)
            .map(|(&k, vol)| call(100.0, k, 0.04, 0.0, 0.5, vol))
            .collect();

        let result = ImpliedVolSolver::default()
            .vega_weighted(&prices, 100.0, &strikes, 0.04, 0.0, 0.5, 5)
            .unwrap();

        for (iv, vol) in result.vols.iter().zip(smile) {
            assert_relative_eq!(*iv, vol, epsilon = 1e-5);
        }
        assert!(result.weighted >= 0.24 - 1e-9);
        assert!(result.weighted <= 0.32 + 1e-9);

        let expected = result
            .vols
            .iter()
            .zip(&result.vegas)
            .map(|(iv, v)| iv * v)
            .sum::<f64>()
            / result.vegas.iter().sum::<f64>();
        assert_relative_eq!(result.weighted, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_only_first_num_options_used() {
        let strikes = [100.0, 105.0, 400.0];
        let prices = [
            call(100.0, 100.0, 0.04, 0.0, 1.0, 0.2),
            call(100.0, 105.0, 0.04, 0.0, 1.0, 0.2),
            f64::NAN,
        ];
        let iv = vega_weighted_iv(&prices, 100.0, &strikes, 0.04, 0.0, 1.0, 2).unwrap();
        assert_relative_eq!(iv, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_floor_quote_carries_no_weight() {
        let strikes = [80.0, 100.0];
        let prices = [1.0, call(100.0, 100.0, 0.04, 0.0, 1.0, 0.3)];

        let result = ImpliedVolSolver::default()
            .vega_weighted(&prices, 100.0, &strikes, 0.04, 0.0, 1.0, 2)
            .unwrap();
        assert_eq!(result.methods[0], SolveMethod::Floor);
        assert_eq!(result.vegas[0], 0.0);
        assert_eq!(result.fallback_count(), 1);
        assert_relative_eq!(result.weighted, 0.3, epsilon = 1e-5);
    }

    #[test]
    fn test_insufficient_quotes() {
        let err = vega_weighted_iv(&[10.0, 8.0], 100.0, &[100.0, 105.0, 110.0], 0.04, 0.0, 1.0, 5)
            .unwrap_err();
        assert_eq!(
            err,
            ImpliedVolError::InsufficientQuotes {
                required: 5,
                available: 2
            }
        );
    }

    #[test]
    fn test_zero_num_options_rejected() {
        let err = vega_weighted_iv(&[10.0], 100.0, &[100.0], 0.04, 0.0, 1.0, 0).unwrap_err();
        assert!(matches!(
            err,
            ImpliedVolError::InvalidParameter {
                name: "num_options",
                ..
            }
        ));
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let err = vega_weighted_iv(&[10.0], 100.0, &[100.0], 0.04, 0.0, 0.0, 1).unwrap_err();
        assert!(matches!(
            err,
            ImpliedVolError::InvalidParameter { name: "expiry", .. }
        ));
    }

    #[test]
    fn test_all_floor_quotes_zero_total_vega() {
        let err = vega_weighted_iv(&[1.0, 2.0], 100.0, &[80.0, 85.0], 0.04, 0.0, 1.0, 2)
            .unwrap_err();
        assert_eq!(err, ImpliedVolError::ZeroTotalVega { count: 2 });
    }

    #[test]
    fn test_solve_method_display() {
        assert_eq!(SolveMethod::Newton.to_string(), "newton");
        assert_eq!(SolveMethod::Brent.to_string(), "brent");
        assert_eq!(SolveMethod::Floor.to_string(), "floor");
    }
}
