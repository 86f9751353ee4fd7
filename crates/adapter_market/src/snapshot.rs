//! Option-chain snapshot and the selection rules that build it.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::MarketDataError;

/// Position in the listed expiries of the expiry that gets used, clamped to
/// the last one when fewer are listed.
pub const EXPIRY_INDEX: usize = 16;

/// Number of most recent dividends summed for the trailing yield.
const DIVIDENDS_PER_YEAR: usize = 4;

const SECONDS_PER_DAY: i64 = 86_400;

/// A single option quote.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price.
    pub strike: f64,
    /// Last traded price.
    pub last_price: f64,
}

impl OptionQuote {
    /// Creates a quote.
    pub fn new(strike: f64, last_price: f64) -> Self {
        Self { strike, last_price }
    }
}

/// Market inputs for one ticker and one expiry.
///
/// `call_prices[i]` is quoted at `strikes[i]`. Put prices are the puts
/// closest to the money, selected independently of the calls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionChainSnapshot {
    /// Ticker symbol, upper case.
    pub ticker: String,
    /// Spot price of the underlying.
    pub spot: f64,
    /// Trailing annual dividend yield.
    pub dividend_yield: f64,
    /// Expiry date of the selected chain.
    pub expiry_date: NaiveDate,
    /// Year fraction from the fetch date to expiry, never negative.
    pub time_to_expiry: f64,
    /// Selected call last prices, closest to the money first.
    pub call_prices: Vec<f64>,
    /// Selected put last prices, closest to the money first.
    pub put_prices: Vec<f64>,
    /// Strikes of the selected calls.
    pub strikes: Vec<f64>,
}

impl OptionChainSnapshot {
    /// Builds a snapshot from raw chain data.
    ///
    /// # Arguments
    ///
    /// * `ticker` - Ticker symbol
    /// * `spot` - Spot price
    /// * `dividends` - Dividend amounts, oldest first
    /// * `expiry_date` - Expiry of the chain
    /// * `now` - Valuation time, local clock
    /// * `calls`, `puts` - Quotes on that expiry
    /// * `num_options` - Quotes kept per side
    ///
    /// # Errors
    ///
    /// `MarketDataError::Data` if the spot is not positive or no call quotes
    /// are available.
    #[allow(clippy::too_many_arguments)]
    pub fn from_chain(
        ticker: &str,
        spot: f64,
        dividends: &[f64],
        expiry_date: NaiveDate,
        now: NaiveDateTime,
        calls: &[OptionQuote],
        puts: &[OptionQuote],
        num_options: usize,
    ) -> Result<Self, MarketDataError> {
        if !(spot > 0.0 && spot.is_finite()) {
            return Err(MarketDataError::Data(format!(
                "invalid spot price {} for {}",
                spot, ticker
            )));
        }
        if calls.is_empty() {
            return Err(MarketDataError::Data(format!(
                "no call quotes for {} expiring {}",
                ticker, expiry_date
            )));
        }

        let selected_calls = select_closest_to_atm(calls, spot, num_options);
        let selected_puts = select_closest_to_atm(puts, spot, num_options);

        Ok(Self {
            ticker: ticker.to_uppercase(),
            spot,
            dividend_yield: trailing_dividend_yield(dividends, spot),
            expiry_date,
            time_to_expiry: time_to_expiry(expiry_date, now),
            call_prices: selected_calls.iter().map(|q| q.last_price).collect(),
            put_prices: selected_puts.iter().map(|q| q.last_price).collect(),
            strikes: selected_calls.iter().map(|q| q.strike).collect(),
        })
    }

    /// Number of call quotes.
    pub fn num_quotes(&self) -> usize {
        self.call_prices.len()
    }

    /// Keeps at most `n` quotes per side.
    pub fn truncate(&mut self, n: usize) {
        self.call_prices.truncate(n);
        self.put_prices.truncate(n);
        self.strikes.truncate(n);
    }

    /// Checks the snapshot is usable for pricing.
    ///
    /// # Errors
    ///
    /// `MarketDataError::Data` on a non-positive spot, a negative time to
    /// expiry, or call prices and strikes of different lengths.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        if !(self.spot > 0.0 && self.spot.is_finite()) {
            return Err(MarketDataError::Data(format!("invalid spot {}", self.spot)));
        }
        if self.time_to_expiry.is_nan() || self.time_to_expiry < 0.0 {
            return Err(MarketDataError::Data(format!(
                "invalid time to expiry {}",
                self.time_to_expiry
            )));
        }
        if self.call_prices.len() != self.strikes.len() {
            return Err(MarketDataError::Data(format!(
                "{} call prices but {} strikes",
                self.call_prices.len(),
                self.strikes.len()
            )));
        }
        Ok(())
    }

    /// Reads a snapshot from a JSON file and validates it.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Parse` on malformed JSON, `Data` if
    /// validation fails.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MarketDataError> {
        let contents = fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&contents)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Writes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be written.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), MarketDataError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Returns the `n` quotes with the smallest `|strike - spot|`, closest first.
///
/// Ties keep their input order.
pub fn select_closest_to_atm(quotes: &[OptionQuote], spot: f64, n: usize) -> Vec<OptionQuote> {
    let mut sorted = quotes.to_vec();
    // sort_by is stable
    sorted.sort_by(|a, b| (a.strike - spot).abs().total_cmp(&(b.strike - spot).abs()));
    sorted.truncate(n);
    sorted
}

/// Sum of the last four dividends over spot, or zero with fewer than four.
///
/// # Examples
///
/// ```
/// use adapter_market::trailing_dividend_yield;
///
/// assert_eq!(trailing_dividend_yield(&[0.5, 0.5, 0.5, 0.5, 0.5], 100.0), 0.02);
/// assert_eq!(trailing_dividend_yield(&[0.5, 0.5, 0.5], 100.0), 0.0);
/// ```
pub fn trailing_dividend_yield(dividends: &[f64], spot: f64) -> f64 {
    if dividends.len() < DIVIDENDS_PER_YEAR {
        return 0.0;
    }
    let annual: f64 = dividends[dividends.len() - DIVIDENDS_PER_YEAR..].iter().sum();
    annual / spot
}

/// Picks the expiry at [`EXPIRY_INDEX`], or the last one if fewer are listed.
pub fn select_expiry(expiries: &[NaiveDate]) -> Option<NaiveDate> {
    if expiries.is_empty() {
        return None;
    }
    expiries.get(EXPIRY_INDEX.min(expiries.len() - 1)).copied()
}

/// Whole days from `now` to midnight starting `expiry`, over 365, floored
/// at zero.
///
/// Partial days are dropped, so any time past midnight counts one day less
/// than the calendar difference.
///
/// # Examples
///
/// ```
/// use adapter_market::time_to_expiry;
/// use chrono::NaiveDate;
///
/// let expiry = NaiveDate::from_ymd_opt(2026, 4, 24).unwrap();
/// let today = NaiveDate::from_ymd_opt(2026, 3, 25).unwrap();
///
/// let at_midnight = today.and_hms_opt(0, 0, 0).unwrap();
/// let mid_session = today.and_hms_opt(14, 30, 0).unwrap();
/// assert_eq!(time_to_expiry(expiry, at_midnight), 30.0 / 365.0);
/// assert_eq!(time_to_expiry(expiry, mid_session), 29.0 / 365.0);
/// ```
pub fn time_to_expiry(expiry: NaiveDate, now: NaiveDateTime) -> f64 {
    let seconds = (expiry.and_time(NaiveTime::MIN) - now).num_seconds();
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    (days as f64 / 365.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(0, 0, 0).unwrap()
    }

    fn chain() -> Vec<OptionQuote> {
        vec![
            OptionQuote::new(80.0, 21.0),
            OptionQuote::new(95.0, 8.0),
            OptionQuote::new(100.0, 5.0),
            OptionQuote::new(105.0, 3.0),
            OptionQuote::new(110.0, 1.5),
            OptionQuote::new(120.0, 0.4),
        ]
    }

    #[test]
    fn test_select_closest_ordered_by_distance() {
        let selected = select_closest_to_atm(&chain(), 103.0, 3);
        let strikes: Vec<f64> = selected.iter().map(|q| q.strike).collect();
        assert_eq!(strikes, vec![105.0, 100.0, 110.0]);
    }

    #[test]
    fn test_select_closest_ties_keep_input_order() {
        let selected = select_closest_to_atm(&chain(), 100.0, 3);
        let strikes: Vec<f64> = selected.iter().map(|q| q.strike).collect();
        assert_eq!(strikes, vec![100.0, 95.0, 105.0]);
    }

    #[test]
    fn test_select_more_than_available() {
        assert_eq!(select_closest_to_atm(&chain(), 100.0, 50).len(), 6);
        assert!(select_closest_to_atm(&[], 100.0, 5).is_empty());
    }

    #[test]
    fn test_trailing_dividend_yield_uses_last_four() {
        let dividends = [1.0, 0.2, 0.3, 0.25, 0.25];
        assert_relative_eq!(trailing_dividend_yield(&dividends, 50.0), 1.0 / 50.0, epsilon = 1e-15);
    }

    #[test]
    fn test_select_expiry() {
        let expiries: Vec<NaiveDate> = (1..=20).map(|d| date(2026, 1, d)).collect();
        assert_eq!(select_expiry(&expiries), Some(date(2026, 1, 17)));
        assert_eq!(select_expiry(&expiries[..3]), Some(date(2026, 1, 3)));
        assert_eq!(select_expiry(&[]), None);
    }

    #[test]
    fn test_time_to_expiry() {
        assert_relative_eq!(
            time_to_expiry(date(2026, 12, 31), midnight(2026, 1, 1)),
            364.0 / 365.0,
            epsilon = 1e-15
        );
        assert_eq!(time_to_expiry(date(2026, 1, 1), midnight(2026, 3, 1)), 0.0);
    }

    #[test]
    fn test_time_to_expiry_drops_partial_day() {
        let expiry = date(2026, 6, 19);
        let cases = [
            (midnight(2026, 6, 9), 10.0),
            (date(2026, 6, 9).and_hms_opt(0, 0, 1).unwrap(), 9.0),
            (date(2026, 6, 9).and_hms_opt(23, 59, 59).unwrap(), 9.0),
            (date(2026, 6, 18).and_hms_opt(9, 30, 0).unwrap(), 0.0),
            (date(2026, 6, 19).and_hms_opt(9, 30, 0).unwrap(), 0.0),
        ];
        for (now, days) in cases {
            assert_eq!(time_to_expiry(expiry, now), days / 365.0, "at {}", now);
        }
    }

    #[test]
    fn test_from_chain() {
        let puts = vec![
            OptionQuote::new(90.0, 0.8),
            OptionQuote::new(100.0, 4.1),
            OptionQuote::new(102.0, 5.0),
        ];
        let snapshot = OptionChainSnapshot::from_chain(
            "aapl",
            101.0,
            &[0.25, 0.25, 0.26, 0.26],
            date(2026, 6, 19),
            midnight(2026, 3, 21),
            &chain(),
            &puts,
            2,
        )
        .unwrap();

        assert_eq!(snapshot.ticker, "AAPL");
        assert_eq!(snapshot.strikes, vec![100.0, 105.0]);
        assert_eq!(snapshot.call_prices, vec![5.0, 3.0]);
        assert_eq!(snapshot.put_prices, vec![4.1, 5.0]);
        assert_relative_eq!(snapshot.dividend_yield, 1.02 / 101.0, epsilon = 1e-15);
        assert_relative_eq!(snapshot.time_to_expiry, 90.0 / 365.0, epsilon = 1e-15);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_from_chain_rejects_bad_input() {
        let today = midnight(2026, 1, 1);
        let expiry = date(2026, 2, 1);
        assert!(matches!(
            OptionChainSnapshot::from_chain("X", 0.0, &[], expiry, today, &chain(), &[], 5),
            Err(MarketDataError::Data(_))
        ));
        assert!(matches!(
            OptionChainSnapshot::from_chain("X", 100.0, &[], expiry, today, &[], &[], 5),
            Err(MarketDataError::Data(_))
        ));
    }

    #[test]
    fn test_validate_length_mismatch() {
        let mut snapshot = OptionChainSnapshot::from_chain(
            "X",
            100.0,
            &[],
            date(2026, 2, 1),
            midnight(2026, 1, 1),
            &chain(),
            &chain(),
            3,
        )
        .unwrap();
        snapshot.strikes.pop();
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_truncate() {
        let mut snapshot = OptionChainSnapshot::from_chain(
            "X",
            100.0,
            &[],
            date(2026, 2, 1),
            midnight(2026, 1, 1),
            &chain(),
            &chain(),
            5,
        )
        .unwrap();
        snapshot.truncate(2);
        assert_eq!(snapshot.num_quotes(), 2);
        assert_eq!(snapshot.put_prices.len(), 2);
    }
}
