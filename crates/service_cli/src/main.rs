//! quant-options CLI - Option Analytics from the Command Line
//!
//! Entry point for the option analytics workspace.
//!
//! # Commands
//!
//! - `quant-options run` - Fetch a chain, back out implied volatility, price
//!   and simulate a call/put position (the default when no command is given)
//! - `quant-options price` - Black-Scholes prices and vega
//! - `quant-options iv` - Implied volatility of a single call quote
//! - `quant-options simulate` - Monte Carlo PnL at a given volatility
//!
//! # Architecture
//!
//! This crate sits on top of the workspace: market data comes from
//! `adapter_market`, pricing and implied volatility from `options_models`,
//! and simulation from `options_mc`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use options_mc::PnlConvention;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod charts;
mod commands;
mod config;
mod error;
mod prompt;

use commands::iv::QuoteInputs;
use commands::price::PriceInputs;
use commands::run::RunInputs;
use commands::simulate::SimulationInputs;
use config::{build_config, CliOverrides, LogLevel};

pub use error::{CliError, Result};

/// Option pricing, implied volatility and PnL simulation
#[derive(Parser)]
#[command(name = "quant-options")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "QUANT_OPTIONS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Continuously compounded risk-free rate
    #[arg(short, long, global = true)]
    rate: Option<f64>,

    /// Number of Monte Carlo paths
    #[arg(short, long, global = true)]
    sims: Option<usize>,

    /// Time steps per year
    #[arg(long, global = true)]
    steps_per_year: Option<usize>,

    /// Number of near-the-money quotes used for implied volatility
    #[arg(short, long, global = true)]
    num_options: Option<usize>,

    /// RNG seed for reproducible simulations
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Directory for chart output
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// PnL convention (expiry, present-value, opportunity-cost)
    #[arg(long, global = true)]
    convention: Option<PnlConvention>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config_file: self.config.clone(),
            rate: self.rate,
            sims: self.sims,
            steps_per_year: self.steps_per_year,
            num_options: self.num_options,
            seed: self.seed,
            output_dir: self.output_dir.clone(),
            convention: self.convention,
            log_level: self.log_level,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a call/put position against the live option chain
    Run(RunArgs),

    /// Black-Scholes prices and vega
    Price {
        /// Spot price
        #[arg(long)]
        spot: f64,

        /// Strike price
        #[arg(short = 'k', long)]
        strike: f64,

        /// Continuous dividend yield
        #[arg(short = 'q', long, default_value = "0")]
        dividend_yield: f64,

        /// Time to expiry in years
        #[arg(short = 't', long)]
        expiry: f64,

        /// Volatility
        #[arg(long)]
        vol: f64,
    },

    /// Implied volatility of a call quote
    Iv {
        /// Market call price
        #[arg(short, long)]
        price: f64,

        /// Spot price
        #[arg(long)]
        spot: f64,

        /// Strike price
        #[arg(short = 'k', long)]
        strike: f64,

        /// Continuous dividend yield
        #[arg(short = 'q', long, default_value = "0")]
        dividend_yield: f64,

        /// Time to expiry in years
        #[arg(short = 't', long)]
        expiry: f64,
    },

    /// Monte Carlo PnL of a call/put position at a given volatility
    Simulate {
        /// Spot price
        #[arg(long)]
        spot: f64,

        /// Volatility
        #[arg(long)]
        vol: f64,

        /// Strike price
        #[arg(short = 'k', long)]
        strike: f64,

        /// Time to expiry in years
        #[arg(short = 't', long)]
        expiry_years: f64,

        /// Call premium paid
        #[arg(long)]
        call_prem: f64,

        /// Put premium paid
        #[arg(long)]
        put_prem: f64,
    },
}

/// Position arguments; anything left out is prompted for.
#[derive(Args, Default)]
struct RunArgs {
    /// Ticker symbol
    #[arg(long, env = "QUANT_OPTIONS_TICKER")]
    ticker: Option<String>,

    /// Call premium paid
    #[arg(long)]
    call_prem: Option<f64>,

    /// Put premium paid
    #[arg(long)]
    put_prem: Option<f64>,

    /// Time to expiry in years
    #[arg(short = 't', long)]
    expiry_years: Option<f64>,

    /// Strike price
    #[arg(short = 'k', long)]
    strike: Option<f64>,

    /// Read the option chain from a JSON snapshot instead of Yahoo
    #[arg(long)]
    market_data: Option<PathBuf>,

    /// Save the fetched option chain as a JSON snapshot
    #[arg(long)]
    save_market_data: Option<PathBuf>,
}

impl From<RunArgs> for RunInputs {
    fn from(args: RunArgs) -> Self {
        RunInputs {
            ticker: args.ticker,
            call_premium: args.call_prem,
            put_premium: args.put_prem,
            expiry: args.expiry_years,
            strike: args.strike,
            market_data: args.market_data,
            save_market_data: args.save_market_data,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli.overrides())?;

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        config.log_level
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    debug!(?config, "Configuration loaded");

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => commands::run::run(&args.into(), &config),
        Commands::Price {
            spot,
            strike,
            dividend_yield,
            expiry,
            vol,
        } => commands::price::run(&PriceInputs {
            spot,
            strike,
            rate: config.rate,
            dividend_yield,
            expiry,
            volatility: vol,
        }),
        Commands::Iv {
            price,
            spot,
            strike,
            dividend_yield,
            expiry,
        } => commands::iv::run(
            &QuoteInputs {
                price,
                spot,
                strike,
                dividend_yield,
                expiry,
            },
            &config,
        ),
        Commands::Simulate {
            spot,
            vol,
            strike,
            expiry_years,
            call_prem,
            put_prem,
        } => commands::simulate::run(
            &SimulationInputs {
                spot,
                volatility: vol,
                strike,
                expiry: expiry_years,
                call_premium: call_prem,
                put_premium: put_prem,
            },
            &config,
        ),
    }
}
