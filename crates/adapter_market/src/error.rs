//! Error types for market data loading.

use thiserror::Error;

/// Errors raised while fetching or loading option-chain data.
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// HTTP request failed or returned a non-success status.
    #[error("Network error: {0}")]
    Network(String),

    /// Response was well-formed but missing the data needed.
    #[error("Data error: {0}")]
    Data(String),

    /// The ticker lists no option expiries.
    #[error("No options available for {ticker}")]
    NoOptions {
        /// Ticker symbol requested.
        ticker: String,
    },

    /// Reading or writing a snapshot file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be decoded.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        MarketDataError::Network(err.to_string())
    }
}
