// In crates/storage/src/lib.rs

use core_types::{Observation, Symbol};
use price_feed::{DayRange, MarketDataProvider};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod error;

// Re-export the most important types for easy access.
pub use error::{Error, Result};

/// The on-disk layout of a saved price series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub observations: Vec<Observation>,
}

/// A price series persisted as a JSON document.
///
/// Serves history to a `HistoricalFeed` without touching the network, which
/// makes replays reproducible.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole series from disk.
    pub fn load(&self) -> Result<PriceSeries> {
        let content = fs::read_to_string(&self.path)?;
        let series: PriceSeries = serde_json::from_str(&content)?;
        Ok(series)
    }

    /// Writes `observations` for `symbol`, replacing any existing file.
    pub fn save(&self, symbol: &Symbol, observations: &[Observation]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let series = PriceSeries {
            symbol: symbol.clone(),
            observations: observations.to_vec(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&series)?)?;
        Ok(())
    }
}

impl MarketDataProvider for JsonFileStore {
    type Error = Error;

    fn fetch_historical_series(&self, symbol: &Symbol, range: DayRange) -> Result<Vec<Observation>> {
        let series = self.load()?;
        if series.symbol != *symbol {
            return Err(Error::SymbolMismatch {
                requested: symbol.0.clone(),
                found: series.symbol.0,
            });
        }
        Ok(series
            .observations
            .into_iter()
            .filter(|obs| range.contains(obs.timestamp.date_naive()))
            .collect())
    }

    fn fetch_current_price(&self, _symbol: &Symbol) -> Result<Decimal> {
        Err(Error::NoLivePrice)
    }
}
