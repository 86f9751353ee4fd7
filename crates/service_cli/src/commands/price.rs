//! Price command implementation
//!
//! Black-Scholes call and put prices for explicit inputs.

use std::io::{self, Write};

use options_models::analytical::{black_scholes_option_price, BlackScholes, OptionPrices};
use tracing::info;

use crate::Result;

/// Black-Scholes inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceInputs {
    /// Spot price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Risk-free rate.
    pub rate: f64,
    /// Dividend yield.
    pub dividend_yield: f64,
    /// Time to expiry in years.
    pub expiry: f64,
    /// Volatility.
    pub volatility: f64,
}

/// Call and put prices plus vega.
pub fn evaluate(inputs: &PriceInputs) -> Result<(OptionPrices<f64>, f64)> {
    let prices = black_scholes_option_price(
        inputs.spot,
        inputs.strike,
        inputs.rate,
        inputs.dividend_yield,
        inputs.expiry,
        inputs.volatility,
    )?;
    let vega = BlackScholes::new(
        inputs.spot,
        inputs.rate,
        inputs.dividend_yield,
        inputs.volatility,
    )?
    .vega(inputs.strike, inputs.expiry);
    Ok((prices, vega))
}

/// Writes the fair-price block.
pub fn write_fair_prices<W: Write>(out: &mut W, prices: &OptionPrices<f64>) -> io::Result<()> {
    writeln!(out, "\nTheoretical fair prices under Black-Scholes:")?;
    writeln!(out, "  Call Price: ${:.2}", prices.call)?;
    writeln!(out, "  Put Price : ${:.2}", prices.put)
}

/// Run the price command
pub fn run(inputs: &PriceInputs) -> Result<()> {
    info!(?inputs, "Pricing with Black-Scholes");
    let (prices, vega) = evaluate(inputs)?;

    let mut out = io::stdout().lock();
    write_fair_prices(&mut out, &prices)?;
    writeln!(out, "  Vega      : {:.4}", vega)?;
    Ok(())
}
