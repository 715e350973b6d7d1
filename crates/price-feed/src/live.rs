// In crates/price-feed/src/live.rs

use crate::error::{Error, Result};
use crate::{MarketDataProvider, PriceFeed};
use chrono::Utc;
use core_types::{Observation, Symbol};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// An unbounded feed that queries the provider for a fresh price on every pull.
///
/// The feed buffers nothing. It keeps reporting `has_next() == true` until
/// a [`StopHandle`] obtained from it is triggered.
pub struct LiveFeed<P> {
    provider: P,
    symbol: Symbol,
    stopped: Arc<AtomicBool>,
}

/// Signals a [`LiveFeed`] to stop reporting more data. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl<P: MarketDataProvider> LiveFeed<P> {
    pub fn new(provider: P, symbol: Symbol) -> Self {
        Self {
            provider,
            symbol,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stopped))
    }
}

impl<P: MarketDataProvider> PriceFeed for LiveFeed<P> {
    fn has_next(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst)
    }

    fn next(&mut self) -> Result<Observation> {
        let price = self
            .provider
            .fetch_current_price(&self.symbol)
            .map_err(Error::unavailable)?;
        Ok(Observation::new(Utc::now(), price)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DayRange;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fmt;

    #[derive(Debug)]
    struct Timeout;

    impl fmt::Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("request timed out")
        }
    }

    impl std::error::Error for Timeout {}

    /// Serves scripted quotes; `None` entries fail.
    struct ScriptedProvider {
        quotes: RefCell<VecDeque<Option<Decimal>>>,
        calls: RefCell<Vec<Symbol>>,
    }

    impl ScriptedProvider {
        fn new(quotes: Vec<Option<Decimal>>) -> Self {
            Self {
                quotes: RefCell::new(quotes.into()),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl MarketDataProvider for ScriptedProvider {
        type Error = Timeout;

        fn fetch_historical_series(
            &self,
            _symbol: &Symbol,
            _range: DayRange,
        ) -> std::result::Result<Vec<Observation>, Timeout> {
            Ok(Vec::new())
        }

        fn fetch_current_price(&self, symbol: &Symbol) -> std::result::Result<Decimal, Timeout> {
            self.calls.borrow_mut().push(symbol.clone());
            self.quotes.borrow_mut().pop_front().flatten().ok_or(Timeout)
        }
    }

    #[test]
    fn every_pull_queries_the_provider() {
        let provider = ScriptedProvider::new(vec![Some(dec!(100)), Some(dec!(101.5))]);
        let mut feed = LiveFeed::new(&provider, Symbol::from("BTC_USDT"));

        let before = Utc::now();
        let first = feed.next().unwrap();
        let second = feed.next().unwrap();

        assert_eq!(first.price, dec!(100));
        assert_eq!(second.price, dec!(101.5));
        assert!(first.timestamp >= before);
        assert!(second.timestamp >= first.timestamp);
        assert_eq!(provider.calls.borrow().len(), 2);
        assert_eq!(provider.calls.borrow()[0], Symbol::from("BTC_USDT"));
    }

    #[test]
    fn failures_propagate_as_unavailable() {
        let provider = ScriptedProvider::new(vec![None, Some(dec!(7))]);
        let mut feed = LiveFeed::new(&provider, Symbol::from("BTC_USDT"));

        let err = feed.next().unwrap_err();
        assert!(matches!(err, Error::Unavailable(_)));
        assert!(err.to_string().contains("request timed out"));
        // The feed itself does not retry, but the next pull works again.
        assert!(feed.has_next());
        assert_eq!(feed.next().unwrap().price, dec!(7));
    }

    #[test]
    fn has_more_until_stopped() {
        let provider = ScriptedProvider::new(Vec::new());
        let feed = LiveFeed::new(&provider, Symbol::from("BTC_USDT"));
        let handle = feed.stop_handle();
        assert_eq!(feed.symbol(), &Symbol::from("BTC_USDT"));
        assert!(feed.has_next());
        assert!(!handle.is_stopped());

        handle.clone().stop();
        assert!(handle.is_stopped());
        assert!(!feed.has_next());
    }

    #[test]
    fn out_of_range_quotes_are_rejected_at_the_boundary() {
        let provider = ScriptedProvider::new(vec![Some(dec!(-1)), Some(dec!(0.12345678901234567))]);
        let mut feed = LiveFeed::new(&provider, Symbol::from("BTC_USDT"));

        assert!(matches!(feed.next(), Err(Error::InvalidPrice(_))));
        assert_eq!(feed.next().unwrap().price, dec!(0.123456789012));
    }
}
