//! Yahoo Finance client.
//!
//! Uses the unofficial public endpoints:
//! - `v8/finance/chart/{ticker}` for closes and dividend events
//! - `v7/finance/options/{ticker}` for expiries and option chains
//!
//! Response parsing is split from the HTTP calls so it can be exercised on
//! stored responses.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate};
use serde::Deserialize;

use crate::error::MarketDataError;
use crate::snapshot::{select_expiry, OptionChainSnapshot, OptionQuote};
use crate::source::MarketDataSource;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Blocking Yahoo Finance client.
#[derive(Clone, Debug)]
pub struct YahooClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooClient {
    /// Creates a client against the public Yahoo Finance host.
    ///
    /// # Errors
    ///
    /// `MarketDataError::Network` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, MarketDataError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against another host, e.g. a local mirror.
    ///
    /// # Errors
    ///
    /// `MarketDataError::Network` if the HTTP client cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, MarketDataError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Last daily close.
    ///
    /// # Errors
    ///
    /// `Network` on HTTP failure, `Data` if no close is reported.
    pub fn get_spot(&self, ticker: &str) -> Result<f64, MarketDataError> {
        let url = format!(
            "{}/v8/finance/chart/{}?range=5d&interval=1d",
            self.base_url, ticker
        );
        parse_spot(&self.get_text(&url)?)
    }

    /// Full dividend history, oldest first.
    ///
    /// # Errors
    ///
    /// `Network` on HTTP failure, `Parse`/`Data` on a malformed response.
    pub fn get_dividends(&self, ticker: &str) -> Result<Vec<f64>, MarketDataError> {
        parse_dividends(&self.get_text(&self.dividends_url(ticker))?)
    }

    // Annual and semi-annual payers need more than a short window to have
    // four events.
    fn dividends_url(&self, ticker: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range=max&interval=1mo&events=div",
            self.base_url, ticker
        )
    }

    /// Listed option expiries, nearest first.
    ///
    /// # Errors
    ///
    /// `Network` on HTTP failure, `Parse`/`Data` on a malformed response.
    pub fn get_expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, MarketDataError> {
        let url = format!("{}/v7/finance/options/{}", self.base_url, ticker);
        parse_expirations(&self.get_text(&url)?)
    }

    /// Calls and puts for one expiry.
    ///
    /// # Errors
    ///
    /// `Network` on HTTP failure, `Parse`/`Data` on a malformed response.
    pub fn get_option_chain(
        &self,
        ticker: &str,
        expiry: NaiveDate,
    ) -> Result<(Vec<OptionQuote>, Vec<OptionQuote>), MarketDataError> {
        let expiry_ts = expiry
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .ok_or_else(|| MarketDataError::Data(format!("invalid expiry {}", expiry)))?;

        let url = format!(
            "{}/v7/finance/options/{}?date={}",
            self.base_url, ticker, expiry_ts
        );
        parse_option_chain(&self.get_text(&url)?)
    }

    fn get_text(&self, url: &str) -> Result<String, MarketDataError> {
        tracing::debug!(url, "Requesting Yahoo Finance data");
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }
}

impl MarketDataSource for YahooClient {
    fn fetch(
        &self,
        ticker: &str,
        num_options: usize,
    ) -> Result<OptionChainSnapshot, MarketDataError> {
        let ticker = ticker.to_uppercase();

        let spot = self.get_spot(&ticker)?;
        let dividends = self.get_dividends(&ticker)?;
        let expiries = self.get_expirations(&ticker)?;
        let expiry = select_expiry(&expiries).ok_or_else(|| MarketDataError::NoOptions {
            ticker: ticker.clone(),
        })?;
        let (calls, puts) = self.get_option_chain(&ticker, expiry)?;

        let snapshot = OptionChainSnapshot::from_chain(
            &ticker,
            spot,
            &dividends,
            expiry,
            Local::now().naive_local(),
            &calls,
            &puts,
            num_options,
        )?;

        tracing::info!(
            ticker = %snapshot.ticker,
            spot = snapshot.spot,
            dividend_yield = snapshot.dividend_yield,
            expiry = %snapshot.expiry_date,
            quotes = snapshot.num_quotes(),
            "Fetched option chain"
        );
        Ok(snapshot)
    }
}

// ================================================================
// Response parsing
// ================================================================

/// Last non-null close in a chart response, falling back to the reported
/// market price.
///
/// # Errors
///
/// `Parse` on malformed JSON, `Data` if the chart is empty or reports an
/// error.
pub fn parse_spot(body: &str) -> Result<f64, MarketDataError> {
    let result = chart_result(body)?;

    let last_close = result
        .indicators
        .quote
        .first()
        .and_then(|q| q.close.as_ref())
        .and_then(|closes| closes.iter().rev().find_map(|c| *c));

    last_close
        .or(result.meta.regular_market_price)
        .ok_or_else(|| MarketDataError::Data("no closing price in chart".to_string()))
}

/// Dividend amounts in a chart response, ordered by date.
///
/// # Errors
///
/// `Parse` on malformed JSON, `Data` if the chart is empty or reports an
/// error.
pub fn parse_dividends(body: &str) -> Result<Vec<f64>, MarketDataError> {
    let result = chart_result(body)?;

    let mut events: Vec<DividendEvent> = result
        .events
        .and_then(|e| e.dividends)
        .map(|d| d.into_values().collect())
        .unwrap_or_default();
    events.sort_by_key(|e| e.date);

    Ok(events.into_iter().map(|e| e.amount).collect())
}

/// Expiry dates listed in an options response.
///
/// # Errors
///
/// `Parse` on malformed JSON, `Data` if the response has no result.
pub fn parse_expirations(body: &str) -> Result<Vec<NaiveDate>, MarketDataError> {
    let result = options_result(body)?;
    Ok(result
        .expiration_dates
        .iter()
        .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
        .collect())
}

/// Calls and puts in an options response. Contracts without a strike or a
/// last price are skipped.
///
/// # Errors
///
/// `Parse` on malformed JSON, `Data` if the response has no result.
pub fn parse_option_chain(
    body: &str,
) -> Result<(Vec<OptionQuote>, Vec<OptionQuote>), MarketDataError> {
    let result = options_result(body)?;
    let Some(chain) = result.options.into_iter().next() else {
        return Ok((Vec::new(), Vec::new()));
    };

    Ok((convert_quotes(&chain.calls), convert_quotes(&chain.puts)))
}

fn convert_quotes(contracts: &[YahooOptionData]) -> Vec<OptionQuote> {
    contracts
        .iter()
        .filter_map(|c| Some(OptionQuote::new(c.strike?, c.last_price?)))
        .collect()
}

fn chart_result(body: &str) -> Result<ChartResult, MarketDataError> {
    let response: ChartResponse = serde_json::from_str(body)?;
    if let Some(err) = response.chart.error {
        return Err(MarketDataError::Data(err.description.unwrap_or(err.code)));
    }
    response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| MarketDataError::Data("no chart data returned".to_string()))
}

fn options_result(body: &str) -> Result<YahooOptionChainData, MarketDataError> {
    let response: YahooOptionsResponse = serde_json::from_str(body)?;
    if let Some(err) = response.option_chain.error {
        return Err(MarketDataError::Data(err.description.unwrap_or(err.code)));
    }
    response
        .option_chain
        .result
        .into_iter()
        .next()
        .ok_or_else(|| MarketDataError::Data("no options data returned".to_string()))
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooApiError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    indicators: ChartIndicators,
    events: Option<ChartEvents>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct ChartEvents {
    dividends: Option<HashMap<String, DividendEvent>>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    #[serde(default)]
    result: Vec<YahooOptionChainData>,
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    strike: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spot_skips_trailing_null() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":190.0},
            "indicators":{"quote":[{"close":[187.5,188.25,null]}]}}],"error":null}}"#;
        assert_eq!(parse_spot(body).unwrap(), 188.25);
    }

    #[test]
    fn test_parse_spot_falls_back_to_market_price() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":42.5},
            "indicators":{"quote":[{}]}}],"error":null}}"#;
        assert_eq!(parse_spot(body).unwrap(), 42.5);
    }

    #[test]
    fn test_chart_error_is_reported() {
        let body = r#"{"chart":{"result":null,
            "error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_spot(body).unwrap_err();
        assert!(matches!(err, MarketDataError::Data(ref msg) if msg.contains("delisted")));
    }

    #[test]
    fn test_parse_dividends_without_events() {
        let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[]}}],"error":null}}"#;
        assert!(parse_dividends(body).unwrap().is_empty());
    }

    #[test]
    fn test_dividends_requested_over_full_history() {
        let client = YahooClient::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(
            client.dividends_url("VOD"),
            "http://localhost:8080/v8/finance/chart/VOD?range=max&interval=1mo&events=div"
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_expirations("<html>"),
            Err(MarketDataError::Parse(_))
        ));
    }

    #[test]
    fn test_option_chain_without_contracts() {
        let body = r#"{"optionChain":{"result":[{"expirationDates":[],"options":[]}],"error":null}}"#;
        let (calls, puts) = parse_option_chain(body).unwrap();
        assert!(calls.is_empty());
        assert!(puts.is_empty());
    }

    #[test]
    #[ignore] // Requires network
    fn test_fetch_live() {
        let client = YahooClient::new().unwrap();
        let snapshot = client.fetch("SPY", 5).unwrap();

        assert!(snapshot.spot > 0.0);
        assert!(snapshot.num_quotes() > 0);
        println!("{:?}", snapshot);
    }
}
