//! Market data sources.

use std::path::{Path, PathBuf};

use crate::error::MarketDataError;
use crate::snapshot::OptionChainSnapshot;

/// Something that can produce an option-chain snapshot for a ticker.
pub trait MarketDataSource {
    /// Fetches spot, dividend yield, expiry and the `num_options` call and
    /// put quotes closest to the money.
    ///
    /// # Errors
    ///
    /// Any [`MarketDataError`] raised by the underlying source.
    fn fetch(&self, ticker: &str, num_options: usize)
        -> Result<OptionChainSnapshot, MarketDataError>;
}

/// Offline snapshot stored as JSON.
///
/// # Examples
///
/// ```no_run
/// use adapter_market::{JsonFileSource, MarketDataSource};
///
/// let source = JsonFileSource::new("snapshots/aapl.json");
/// let snapshot = source.fetch("AAPL", 5).unwrap();
/// println!("spot = {}", snapshot.spot);
/// ```
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Creates a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MarketDataSource for JsonFileSource {
    fn fetch(
        &self,
        ticker: &str,
        num_options: usize,
    ) -> Result<OptionChainSnapshot, MarketDataError> {
        let mut snapshot = OptionChainSnapshot::from_json_file(&self.path)?;

        if !snapshot.ticker.eq_ignore_ascii_case(ticker) {
            tracing::warn!(
                requested = ticker,
                stored = %snapshot.ticker,
                path = %self.path.display(),
                "Snapshot ticker differs from requested ticker"
            );
        }

        snapshot.truncate(num_options);
        tracing::debug!(
            ticker = %snapshot.ticker,
            quotes = snapshot.num_quotes(),
            "Loaded option-chain snapshot from file"
        );
        Ok(snapshot)
    }
}
