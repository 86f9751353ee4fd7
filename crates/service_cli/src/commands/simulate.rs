//! Simulate command implementation
//!
//! Simulates terminal prices under GBM, evaluates the PnL of the long call
//! and long put against them, and exports the charts.

use std::io::{self, Write};
use std::path::PathBuf;

use options_mc::paths::{gbm_terminal_prices, GbmParams};
use options_mc::{PnlParams, PnlSeries, PnlSummary, SimulationConfig, SimulationError};
use tracing::info;

use crate::charts::{self, ChartInputs};
use crate::config::AppConfig;
use crate::Result;

/// The position being analysed and the volatility to simulate with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationInputs {
    /// Spot price.
    pub spot: f64,
    /// Volatility.
    pub volatility: f64,
    /// Strike.
    pub strike: f64,
    /// Time to expiry in years.
    pub expiry: f64,
    /// Call premium paid.
    pub call_premium: f64,
    /// Put premium paid.
    pub put_premium: f64,
}

/// Simulation output.
#[derive(Debug)]
pub struct SimulationReport {
    /// Simulated terminal prices.
    pub terminals: Vec<f64>,
    /// Per-path PnL.
    pub pnl: PnlSeries,
    /// Call leg statistics.
    pub call: PnlSummary,
    /// Put leg statistics.
    pub put: PnlSummary,
    /// Chart files written.
    pub charts: Vec<PathBuf>,
}

/// Runs the simulation and writes charts to the configured directory.
pub fn simulate(inputs: &SimulationInputs, config: &AppConfig) -> Result<SimulationReport> {
    let sim_config = SimulationConfig::builder()
        .n_paths(config.sims)
        .steps_per_year(config.steps_per_year)
        .maybe_seed(config.seed)
        .build()
        .map_err(SimulationError::from)?;

    let params = GbmParams::new(inputs.spot, config.rate, inputs.volatility, inputs.expiry)
        .with_steps_per_year(sim_config.steps_per_year());
    let mut rng = sim_config.rng();

    info!(
        paths = sim_config.n_paths(),
        steps = params.n_steps(),
        seed = ?rng.seed(),
        "Simulating terminal prices"
    );
    let terminals = gbm_terminal_prices(&params, sim_config.n_paths(), &mut rng)?;

    let pnl_params = PnlParams::new(
        inputs.strike,
        config.rate,
        inputs.expiry,
        inputs.call_premium,
        inputs.put_premium,
    );
    let pnl = PnlSeries::from_terminal_prices(&terminals, &pnl_params, config.convention);
    let call = pnl.call_summary()?;
    let put = pnl.put_summary()?;

    let charts = charts::write_all(
        &config.output_dir,
        &ChartInputs {
            terminals: &terminals,
            pnl: &pnl,
            strike: inputs.strike,
            call_premium: inputs.call_premium,
            put_premium: inputs.put_premium,
        },
        &config.charts,
    )?;

    Ok(SimulationReport {
        terminals,
        pnl,
        call,
        put,
        charts,
    })
}

fn write_leg<W: Write>(out: &mut W, name: &str, summary: &PnlSummary) -> io::Result<()> {
    writeln!(
        out,
        "  {}: mean ${:.2} (± {:.2}), win rate {:.1}%, total ${:.2}",
        name,
        summary.mean,
        summary.std_error,
        summary.win_rate * 100.0,
        summary.total
    )
}

/// Writes the Monte Carlo summary and the chart list.
pub fn write_report<W: Write>(out: &mut W, report: &SimulationReport) -> io::Result<()> {
    writeln!(
        out,
        "\nMonte Carlo PnL ({}, {} paths):",
        report.pnl.convention(),
        report.pnl.len()
    )?;
    write_leg(out, "Call Option", &report.call)?;
    write_leg(out, "Put Option ", &report.put)?;

    writeln!(out, "\nCharts written:")?;
    for path in &report.charts {
        writeln!(out, "  {}", path.display())?;
    }
    Ok(())
}

/// Run the simulate command
pub fn run(inputs: &SimulationInputs, config: &AppConfig) -> Result<()> {
    let report = simulate(inputs, config)?;
    let mut out = io::stdout().lock();
    write_report(&mut out, &report)?;
    Ok(())
}
