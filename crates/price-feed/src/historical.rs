// In crates/price-feed/src/historical.rs

use crate::error::{Error, Result};
use crate::types::DayRange;
use crate::{MarketDataProvider, PriceFeed};
use core_types::{Observation, Symbol};

/// A bounded, pre-fetched series replayed in forward chronological order.
///
/// The cursor only moves forward. Once every observation has been pulled the
/// feed stays exhausted; there is no rewind.
#[derive(Debug, Clone)]
pub struct HistoricalFeed {
    observations: Vec<Observation>,
    idx: usize,
}

impl HistoricalFeed {
    /// Wraps an already ordered series. The series is stored verbatim.
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations, idx: 0 }
    }

    /// Loads the series for `symbol` over `range` from a market-data provider.
    pub fn load<P>(provider: &P, symbol: &Symbol, range: DayRange) -> Result<Self>
    where
        P: MarketDataProvider + ?Sized,
    {
        let observations = provider
            .fetch_historical_series(symbol, range)
            .map_err(Error::unavailable)?;
        Ok(Self::new(observations))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of observations not yet pulled.
    pub fn remaining(&self) -> usize {
        self.observations.len() - self.idx
    }

    /// Index of the next observation to be pulled.
    pub fn position(&self) -> usize {
        self.idx
    }

    /// The most recent observation that has been pulled, if any.
    pub fn last_pulled(&self) -> Option<&Observation> {
        self.idx.checked_sub(1).and_then(|i| self.observations.get(i))
    }
}

impl PriceFeed for HistoricalFeed {
    fn has_next(&self) -> bool {
        self.idx < self.observations.len()
    }

    fn next(&mut self) -> Result<Observation> {
        let observation = self
            .observations
            .get(self.idx)
            .copied()
            .ok_or(Error::Exhausted { len: self.observations.len() })?;
        self.idx += 1;
        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::fmt;

    fn day(i: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::days(i)
    }

    fn series(prices: &[Decimal]) -> Vec<Observation> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| Observation::new(day(i as i64), *p).unwrap())
            .collect()
    }

    #[derive(Debug)]
    struct Offline;

    impl fmt::Display for Offline {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("provider offline")
        }
    }

    impl std::error::Error for Offline {}

    struct StubProvider {
        series: Option<Vec<Observation>>,
    }

    impl MarketDataProvider for StubProvider {
        type Error = Offline;

        fn fetch_historical_series(
            &self,
            _symbol: &Symbol,
            _range: DayRange,
        ) -> std::result::Result<Vec<Observation>, Offline> {
            self.series.clone().ok_or(Offline)
        }

        fn fetch_current_price(&self, _symbol: &Symbol) -> std::result::Result<Decimal, Offline> {
            Err(Offline)
        }
    }

    fn range() -> DayRange {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        DayRange::trailing(3, d)
    }

    #[test]
    fn replays_in_order_then_exhausts() {
        let data = series(&[dec!(1), dec!(2), dec!(3)]);
        let mut feed = HistoricalFeed::new(data.clone());
        assert_eq!(feed.len(), 3);

        for expected in &data {
            assert!(feed.has_next());
            assert_eq!(feed.next().unwrap(), *expected);
        }
        assert!(!feed.has_next());
        assert_eq!(feed.remaining(), 0);
        assert_eq!(feed.position(), 3);
        assert_eq!(feed.last_pulled(), data.last());
        assert!(matches!(feed.next(), Err(Error::Exhausted { len: 3 })));
        // Exhaustion is permanent.
        assert!(!feed.has_next());
        assert!(matches!(feed.next(), Err(Error::Exhausted { .. })));
    }

    #[test]
    fn empty_feed_is_exhausted_from_the_start() {
        let mut feed = HistoricalFeed::new(Vec::new());
        assert!(feed.is_empty());
        assert!(!feed.has_next());
        assert!(feed.last_pulled().is_none());
        assert!(matches!(feed.next(), Err(Error::Exhausted { len: 0 })));
    }

    #[test]
    fn load_keeps_provider_order_verbatim() {
        // Deliberately unsorted: the feed does not re-order what it is given.
        let data = series(&[dec!(5), dec!(4), dec!(6)]);
        let provider = StubProvider { series: Some(vec![data[1], data[0], data[2]]) };
        let mut feed = HistoricalFeed::load(&provider, &Symbol::from("ETH_USDT"), range()).unwrap();
        assert_eq!(feed.next().unwrap().price, dec!(4));
        assert_eq!(feed.next().unwrap().price, dec!(5));
        assert_eq!(feed.remaining(), 1);
    }

    #[test]
    fn load_surfaces_provider_failure_as_unavailable() {
        let provider = StubProvider { series: None };
        let err = HistoricalFeed::load(&provider, &Symbol::from("ETH_USDT"), range()).unwrap_err();
        assert!(matches!(err, Error::Unavailable(_)));
        assert_eq!(err.to_string(), "Price source unavailable: provider offline");
    }
}
