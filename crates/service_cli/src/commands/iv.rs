//! Implied volatility command implementation

use std::io::{self, Write};

use options_models::implied_vol::{ImpliedVolSolver, SolveMethod};
use tracing::info;

use crate::config::AppConfig;
use crate::Result;

/// One call quote.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuoteInputs {
    /// Market call price.
    pub price: f64,
    /// Spot price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Dividend yield.
    pub dividend_yield: f64,
    /// Time to expiry in years.
    pub expiry: f64,
}

/// Implied volatility of the quote with the configured solver.
pub fn solve(quote: &QuoteInputs, config: &AppConfig) -> Result<(f64, SolveMethod)> {
    let solver = ImpliedVolSolver::new(config.solver.to_iv_config()?)?;
    Ok(solver.solve_one(
        quote.price,
        quote.spot,
        quote.strike,
        config.rate,
        quote.dividend_yield,
        quote.expiry,
    )?)
}

/// Run the iv command
pub fn run(quote: &QuoteInputs, config: &AppConfig) -> Result<()> {
    info!(?quote, rate = config.rate, "Solving implied volatility");
    let (iv, method) = solve(quote, config)?;

    let mut out = io::stdout().lock();
    writeln!(out, "Implied volatility: {:.4} (solved by {})", iv, method)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_recovers_volatility() {
        let config = AppConfig {
            rate: 0.05,
            ..Default::default()
        };
        let quote = QuoteInputs {
            price: 10.450583572185565,
            spot: 100.0,
            strike: 100.0,
            dividend_yield: 0.0,
            expiry: 1.0,
        };
        let (iv, method) = solve(&quote, &config).unwrap();
        assert_relative_eq!(iv, 0.2, epsilon = 1e-6);
        assert_eq!(method, SolveMethod::Newton);
    }

    #[test]
    fn test_below_intrinsic_hits_floor() {
        let config = AppConfig::default();
        let quote = QuoteInputs {
            price: 1.0,
            spot: 150.0,
            strike: 100.0,
            dividend_yield: 0.0,
            expiry: 0.5,
        };
        let (iv, method) = solve(&quote, &config).unwrap();
        assert_eq!(method, SolveMethod::Floor);
        assert_eq!(iv, 1e-9);
    }

    #[test]
    fn test_invalid_quote() {
        let quote = QuoteInputs {
            price: 5.0,
            spot: 100.0,
            strike: 100.0,
            dividend_yield: 0.0,
            expiry: -1.0,
        };
        assert!(solve(&quote, &AppConfig::default()).is_err());
    }
}
