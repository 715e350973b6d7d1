// In crates/api-client/src/lib.rs

use app_config::types::MarketDataSettings;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use core_types::{Observation, Symbol};
use price_feed::{DayRange, MarketDataProvider};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// The maximum number of candles the exchange returns per request.
const MAX_CANDLES_PER_REQUEST: u64 = 300;

impl ApiClient {
    /// Constructs a new ApiClient from MarketDataSettings.
    pub fn new(settings: &MarketDataSettings) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;
        Ok(ApiClient {
            http_client,
            base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
            timeframe: settings.timeframe.clone(),
        })
    }

    /// Sends a GET request and unwraps the response envelope.
    fn get<T: DeserializeOwned>(&self, method: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        tracing::debug!(url = %url, ?query, "Requesting market data.");

        let body = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .map_err(Error::RequestFailed)?
            .text()
            .map_err(Error::RequestFailed)?;

        parse_response(&body, method)
    }

    /// Fetches candles for `symbol` over `range`.
    ///
    /// This corresponds to the `GET public/get-candlestick` endpoint. Ranges
    /// longer than one page are fetched page by page.
    pub fn get_candles(&self, symbol: &Symbol, range: DayRange) -> Result<Vec<Candle>> {
        let mut candles = Vec::new();
        let mut cursor = range.start;

        loop {
            let page_end = cursor
                .checked_add_days(Days::new(MAX_CANDLES_PER_REQUEST - 1))
                .map_or(range.end, |d| d.min(range.end));

            let query = [
                ("instrument_name", symbol.0.clone()),
                ("timeframe", self.timeframe.clone()),
                ("count", MAX_CANDLES_PER_REQUEST.to_string()),
                ("start_ts", start_of_day_millis(cursor).to_string()),
                ("end_ts", end_of_day_millis(page_end).to_string()),
            ];
            let page: CandlestickResult = self.get("public/get-candlestick", &query)?;
            tracing::debug!(symbol = %symbol, from = %cursor, to = %page_end, count = page.data.len(), "Received candles.");
            candles.extend(page.data);

            match page_end.succ_opt() {
                Some(next) if page_end < range.end => cursor = next,
                _ => break,
            }
        }

        Ok(candles)
    }

    /// Fetches the latest traded price for `symbol`.
    ///
    /// This corresponds to the `GET public/get-tickers` endpoint.
    pub fn get_last_price(&self, symbol: &Symbol) -> Result<Decimal> {
        let query = [("instrument_name", symbol.0.clone())];
        let tickers: TickerResult = self.get("public/get-tickers", &query)?;
        last_price_for(&tickers, symbol)
    }
}

impl MarketDataProvider for ApiClient {
    type Error = Error;

    fn fetch_historical_series(&self, symbol: &Symbol, range: DayRange) -> Result<Vec<Observation>> {
        let candles = self.get_candles(symbol, range)?;
        let series = candles_to_series(&candles, range)?;
        tracing::info!(symbol = %symbol, count = series.len(), start = %range.start, end = %range.end, "Loaded historical closing prices.");
        Ok(series)
    }

    fn fetch_current_price(&self, symbol: &Symbol) -> Result<Decimal> {
        self.get_last_price(symbol)
    }
}

// Free function to allow api_client::new usage
pub fn new(settings: &MarketDataSettings) -> Result<ApiClient> {
    ApiClient::new(settings)
}

/// Unwraps a response envelope, turning a non-zero `code` into `Error::ApiError`.
pub fn parse_response<T: DeserializeOwned>(body: &str, method: &str) -> Result<T> {
    let response: ApiResponse<T> = serde_json::from_str(body).map_err(Error::DeserializationFailed)?;
    if response.code != 0 {
        let msg = response.message.unwrap_or_else(|| "Unknown error".to_string());
        return Err(Error::ApiError { code: response.code, msg });
    }
    response.result.ok_or_else(|| Error::MissingData(method.to_string()))
}

/// Turns raw candles into one closing price per day within `range`, oldest first.
///
/// Pages may overlap or arrive newest first, so candles are sorted and only
/// the first candle of each calendar day is kept.
pub fn candles_to_series(candles: &[Candle], range: DayRange) -> Result<Vec<Observation>> {
    let mut series = candles
        .iter()
        .map(|candle| {
            let timestamp = millis_to_utc(candle.open_time)?;
            Ok(Observation::new(timestamp, candle.close)?)
        })
        .collect::<Result<Vec<_>>>()?;

    series.retain(|obs| range.contains(obs.timestamp.date_naive()));
    series.sort_by_key(|obs| obs.timestamp);
    series.dedup_by_key(|obs| obs.timestamp.date_naive());
    Ok(series)
}

/// Picks the latest trade price for `symbol` out of a tickers result.
pub fn last_price_for(tickers: &TickerResult, symbol: &Symbol) -> Result<Decimal> {
    tickers
        .data
        .iter()
        .find(|t| t.instrument_name == symbol.0)
        .and_then(|t| t.last_price)
        .ok_or_else(|| Error::MissingData(format!("ticker {}", symbol)))
}

fn millis_to_utc(millis: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(Error::InvalidTimestamp(millis))
}

fn start_of_day_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

fn end_of_day_millis(date: NaiveDate) -> i64 {
    match date.succ_opt() {
        Some(next) => start_of_day_millis(next) - 1,
        None => start_of_day_millis(date),
    }
}
