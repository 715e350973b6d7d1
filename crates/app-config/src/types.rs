// In crates/app-config/src/types.rs

use serde::Deserialize;

use core_types::StrategyConfig;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the market-data REST API.
    pub market_data: MarketDataSettings,
    /// Which instrument to trade and how to pace the feed.
    #[serde(default)]
    pub feed: FeedSettings,
    /// The strategy to run and its parameters.
    #[serde(default)]
    pub strategy: StrategyConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MarketDataSettings {
    /// The REST API base URL.
    pub rest_base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// The candlestick timeframe used for history.
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FeedSettings {
    /// The instrument to trade (e.g., "ETH_USDT").
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// How many days of history a backtest replays when no dates are given.
    #[serde(default = "default_day_range")]
    pub historical_day_range: u64,
    /// Seconds between two polls of the live price.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// How long the live loop keeps retrying an unavailable source.
    #[serde(default = "default_max_retry_elapsed")]
    pub max_retry_elapsed_secs: u64,
    /// A JSON price file to replay instead of calling the API.
    #[serde(default)]
    pub data_file: Option<String>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            historical_day_range: default_day_range(),
            poll_interval_secs: default_poll_interval(),
            max_retry_elapsed_secs: default_max_retry_elapsed(),
            data_file: None,
        }
    }
}

/// Helper functions for serde defaults
fn default_log_level() -> String { "info".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_timeframe() -> String { "1D".to_string() }
fn default_symbol() -> String { "ETH_USDT".to_string() }
fn default_day_range() -> u64 { 365 }
fn default_poll_interval() -> u64 { 60 }
fn default_max_retry_elapsed() -> u64 { 300 }
