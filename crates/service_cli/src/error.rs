//! CLI error type.

use adapter_market::MarketDataError;
use options_mc::SimulationError;
use options_models::analytical::AnalyticalError;
use options_models::implied_vol::ImpliedVolError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `quant-options` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration file, environment variable or flag.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid command argument or interactive input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Market data could not be fetched or loaded.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Black-Scholes rejected its inputs.
    #[error("Pricing error: {0}")]
    Pricing(#[from] AnalyticalError),

    /// Implied volatility could not be computed.
    #[error("Implied volatility error: {0}")]
    ImpliedVol(#[from] ImpliedVolError),

    /// Monte Carlo simulation or statistics failed.
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// CSV export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON export failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
