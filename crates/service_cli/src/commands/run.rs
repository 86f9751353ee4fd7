//! Run command implementation
//!
//! The full pipeline: fetch the option chain, back out a vega-weighted
//! implied volatility, price the position under Black-Scholes, then simulate
//! its PnL.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use adapter_market::{JsonFileSource, MarketDataSource, OptionChainSnapshot, YahooClient};
use options_mc::pnl::expected_pnl;
use options_models::analytical::{black_scholes_option_price, OptionPrices};
use options_models::implied_vol::{ImpliedVolResult, ImpliedVolSolver};
use tracing::info;

use super::price::write_fair_prices;
use super::simulate::{self, SimulationInputs, SimulationReport};
use crate::config::AppConfig;
use crate::prompt::{self, Prompter};
use crate::{CliError, Result};

/// Values given on the command line; missing ones are prompted for.
#[derive(Clone, Debug, Default)]
pub struct RunInputs {
    /// Ticker symbol.
    pub ticker: Option<String>,
    /// Call premium paid.
    pub call_premium: Option<f64>,
    /// Put premium paid.
    pub put_premium: Option<f64>,
    /// Time to expiry of the position in years.
    pub expiry: Option<f64>,
    /// Strike of the position.
    pub strike: Option<f64>,
    /// Load the option chain from this JSON snapshot instead of Yahoo.
    pub market_data: Option<PathBuf>,
    /// Save the fetched option chain to this JSON file.
    pub save_market_data: Option<PathBuf>,
}

/// The position being analysed.
#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    /// Upper-case ticker symbol.
    pub ticker: String,
    /// Call premium paid.
    pub call_premium: f64,
    /// Put premium paid.
    pub put_premium: f64,
    /// Time to expiry in years.
    pub expiry: f64,
    /// Strike.
    pub strike: f64,
}

/// Fills in missing values by asking, in the order ticker, call premium,
/// put premium, expiry, strike.
///
/// # Errors
///
/// `CliError::InvalidArgument` if input ends, a premium is negative, or the
/// expiry or strike is not positive.
pub fn resolve_position<R: BufRead, W: Write>(
    inputs: &RunInputs,
    prompter: &mut Prompter<R, W>,
) -> Result<Position> {
    let ticker = match &inputs.ticker {
        Some(t) => t.trim().to_string(),
        None => prompter.ask_string("Enter the stock ticker symbol: ")?,
    }
    .to_uppercase();
    if ticker.is_empty() {
        return Err(CliError::InvalidArgument("ticker must not be empty".to_string()));
    }

    let call_premium =
        prompter.f64_or_ask(inputs.call_premium, "Enter your option's call premium: ")?;
    let put_premium =
        prompter.f64_or_ask(inputs.put_premium, "Enter your option's put premium: ")?;
    let expiry = prompter.f64_or_ask(
        inputs.expiry,
        "Enter your option's time to expiry (in years): ",
    )?;
    let strike = prompter.f64_or_ask(inputs.strike, "Enter your option's strike price: ")?;

    for (name, value) in [("call premium", call_premium), ("put premium", put_premium)] {
        if value < 0.0 {
            return Err(CliError::InvalidArgument(format!(
                "{} must not be negative, got {}",
                name, value
            )));
        }
    }
    for (name, value) in [("time to expiry", expiry), ("strike", strike)] {
        if !(value > 0.0) {
            return Err(CliError::InvalidArgument(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
    }

    Ok(Position {
        ticker,
        call_premium,
        put_premium,
        expiry,
        strike,
    })
}

/// Everything the run command reports.
#[derive(Debug)]
pub struct RunReport {
    /// Market snapshot used.
    pub snapshot: OptionChainSnapshot,
    /// Implied volatility per quote and weighted.
    pub iv: ImpliedVolResult,
    /// Black-Scholes prices of the position at the implied volatility.
    pub fair: OptionPrices<f64>,
    /// Expected call PnL in present-value terms.
    pub expected_call: f64,
    /// Expected put PnL in present-value terms.
    pub expected_put: f64,
    /// Monte Carlo results.
    pub simulation: SimulationReport,
}

/// Prices and simulates `position` against `snapshot`.
pub fn analyse(
    position: &Position,
    snapshot: &OptionChainSnapshot,
    config: &AppConfig,
) -> Result<RunReport> {
    let solver = ImpliedVolSolver::new(config.solver.to_iv_config()?)?;
    let iv = solver.vega_weighted(
        &snapshot.call_prices,
        snapshot.spot,
        &snapshot.strikes,
        config.rate,
        snapshot.dividend_yield,
        snapshot.time_to_expiry,
        config.num_options,
    )?;
    let sigma = iv.weighted;
    info!(
        sigma,
        fallbacks = iv.fallback_count(),
        "Vega-weighted implied volatility"
    );

    let fair = black_scholes_option_price(
        snapshot.spot,
        position.strike,
        config.rate,
        snapshot.dividend_yield,
        position.expiry,
        sigma,
    )?;

    let simulation = simulate::simulate(
        &SimulationInputs {
            spot: snapshot.spot,
            volatility: sigma,
            strike: position.strike,
            expiry: position.expiry,
            call_premium: position.call_premium,
            put_premium: position.put_premium,
        },
        config,
    )?;

    Ok(RunReport {
        snapshot: snapshot.clone(),
        fair,
        expected_call: expected_pnl(fair.call, position.call_premium, config.rate, position.expiry),
        expected_put: expected_pnl(fair.put, position.put_premium, config.rate, position.expiry),
        iv,
        simulation,
    })
}

/// Writes the run summary.
pub fn write_report<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    let snapshot = &report.snapshot;
    writeln!(
        out,
        "\n{}: spot ${:.2}, dividend yield {:.4}, chain expiry {} (T = {:.4})",
        snapshot.ticker,
        snapshot.spot,
        snapshot.dividend_yield,
        snapshot.expiry_date,
        snapshot.time_to_expiry
    )?;

    writeln!(
        out,
        "\nEstimated vega-weighted implied volatility: {:.4}",
        report.iv.weighted
    )?;
    write_fair_prices(out, &report.fair)?;

    writeln!(out, "\nExpected returns (present value):")?;
    writeln!(out, "  Call Option: ${:.2}", report.expected_call)?;
    writeln!(out, "  Put Option : ${:.2}", report.expected_put)?;

    simulate::write_report(out, &report.simulation)
}

fn load_snapshot(inputs: &RunInputs, ticker: &str, config: &AppConfig) -> Result<OptionChainSnapshot> {
    let source: Box<dyn MarketDataSource> = match &inputs.market_data {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(YahooClient::new()?),
    };
    let snapshot = source.fetch(ticker, config.num_options)?;

    if let Some(path) = &inputs.save_market_data {
        snapshot.to_json_file(path)?;
        info!(path = %path.display(), "Saved option-chain snapshot");
    }
    Ok(snapshot)
}

/// Run the full pipeline
pub fn run(inputs: &RunInputs, config: &AppConfig) -> Result<()> {
    let position = resolve_position(inputs, &mut prompt::stdio())?;
    let snapshot = load_snapshot(inputs, &position.ticker, config)?;
    let report = analyse(&position, &snapshot, config)?;

    let mut out = io::stdout().lock();
    write_report(&mut out, &report)?;
    Ok(())
}
