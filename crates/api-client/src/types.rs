// In crates/api-client/src/types.rs

use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

/// The client for the Crypto.com Exchange public market-data API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent, blocking HTTP client.
    pub http_client: Client,
    /// The base URL of the REST API (e.g., "https://api.crypto.com/exchange/v1").
    pub base_url: String,
    /// The candlestick timeframe requested for history (e.g., "1D").
    pub timeframe: String,
}

/// The envelope every Crypto.com REST response is wrapped in.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    pub result: Option<T>,
}

/// The `result` object of a `public/get-candlestick` response.
#[derive(Debug, Deserialize)]
pub struct CandlestickResult {
    #[serde(default)]
    pub instrument_name: Option<String>,
    #[serde(default)]
    pub data: Vec<Candle>,
}

/// A single candle. Prices arrive either as JSON strings or numbers.
#[derive(Debug, Deserialize, Clone)]
pub struct Candle {
    /// Candle start time in milliseconds.
    #[serde(rename = "t")]
    pub open_time: i64,
    #[serde(rename = "o")]
    pub open: Decimal,
    #[serde(rename = "h")]
    pub high: Decimal,
    #[serde(rename = "l")]
    pub low: Decimal,
    #[serde(rename = "c")]
    pub close: Decimal,
    #[serde(rename = "v")]
    pub volume: Decimal,
}

/// The `result` object of a `public/get-tickers` response.
#[derive(Debug, Deserialize)]
pub struct TickerResult {
    #[serde(default)]
    pub data: Vec<Ticker>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Ticker {
    /// Instrument name.
    #[serde(rename = "i")]
    pub instrument_name: String,
    /// Price of the latest trade, absent if nothing has traded yet.
    #[serde(rename = "a", default)]
    pub last_price: Option<Decimal>,
    /// Best bid.
    #[serde(rename = "b", default)]
    pub best_bid: Option<Decimal>,
    /// Best ask.
    #[serde(rename = "k", default)]
    pub best_ask: Option<Decimal>,
    /// Ticker time in milliseconds.
    #[serde(rename = "t")]
    pub timestamp: i64,
}
