// In crates/price-feed/src/lib.rs

use core_types::{Observation, Symbol};
use rust_decimal::Decimal;

pub mod error;
pub mod historical;
pub mod live;
pub mod types;

// Re-export public types
pub use error::{Error, Result, SourceError};
pub use historical::HistoricalFeed;
pub use live::{LiveFeed, StopHandle};
pub use types::DayRange;

/// The universal pull interface for a sequence of price observations.
///
/// Consumers loop `while feed.has_next() { feed.next()? }` and never look at
/// how the observations are produced, so a historical replay and a live
/// polling session are fully interchangeable.
pub trait PriceFeed {
    /// Whether another observation can be pulled.
    fn has_next(&self) -> bool;

    /// Pulls the next observation.
    ///
    /// # Errors
    ///
    /// * `Error::Exhausted` if a bounded feed is pulled past its end.
    /// * `Error::Unavailable` if the underlying source could not be reached.
    fn next(&mut self) -> Result<Observation>;
}

impl<F: PriceFeed + ?Sized> PriceFeed for Box<F> {
    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<Observation> {
        (**self).next()
    }
}

/// The pull contract of an external market-data provider.
///
/// Implementations own their network sessions, authentication, rate limiting
/// and response parsing. Historical series must be returned in chronological
/// order with at most one observation per date.
pub trait MarketDataProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Daily closing prices for `symbol` over `range`, oldest first.
    fn fetch_historical_series(
        &self,
        symbol: &Symbol,
        range: DayRange,
    ) -> std::result::Result<Vec<Observation>, Self::Error>;

    /// The freshest traded price for `symbol`.
    fn fetch_current_price(&self, symbol: &Symbol) -> std::result::Result<Decimal, Self::Error>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for &P {
    type Error = P::Error;

    fn fetch_historical_series(
        &self,
        symbol: &Symbol,
        range: DayRange,
    ) -> std::result::Result<Vec<Observation>, Self::Error> {
        (**self).fetch_historical_series(symbol, range)
    }

    fn fetch_current_price(&self, symbol: &Symbol) -> std::result::Result<Decimal, Self::Error> {
        (**self).fetch_current_price(symbol)
    }
}
