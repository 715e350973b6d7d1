// In crates/engine/src/lib.rs

pub mod logger;
pub mod report;

use crate::logger::TradeLogger;
use crate::report::{RunReport, RunSummary};
use anyhow::Result;
use backoff::ExponentialBackoff;
use core_types::{Observation, Symbol, TradeEvent};
use price_feed::PriceFeed;
use std::time::{Duration, Instant};
use strategies::Strategy;

pub use logger::Trade;

/// How the engine retries a live source that reports itself unavailable.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    /// Give up once retries have been failing for this long.
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(60),
            max_elapsed: Duration::from_secs(300),
        }
    }
}

/// Knobs of the driver loop.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Pause between two consecutive pulls (the live polling cadence).
    pub pacing: Option<Duration>,
    /// Stop after this many observations.
    pub max_observations: Option<u64>,
    /// Retry `Unavailable` pulls instead of failing on the first one.
    pub retry: Option<RetryPolicy>,
}

/// The driver loop: pulls observations from a feed and feeds them to a strategy.
pub struct Engine {
    /// The symbol being traded.
    pub symbol: Symbol,
    feed: Box<dyn PriceFeed + Send>,
    strategy: Box<dyn Strategy + Send>,
    options: EngineOptions,
    logger: TradeLogger,
}

impl Engine {
    pub fn new(
        symbol: Symbol,
        feed: Box<dyn PriceFeed + Send>,
        strategy: Box<dyn Strategy + Send>,
    ) -> Self {
        Self {
            symbol,
            feed,
            strategy,
            options: EngineOptions::default(),
            logger: TradeLogger::new(),
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// The events recorded so far.
    pub fn events(&self) -> &[TradeEvent] {
        &self.logger.events
    }

    /// Runs until the feed is exhausted or the observation limit is reached.
    pub fn run(&mut self) -> Result<RunReport> {
        tracing::info!(symbol = %self.symbol, strategy = self.strategy.name(), "Starting run.");

        let mut observations: u64 = 0;
        let mut first: Option<Observation> = None;
        let mut last: Option<Observation> = None;

        while self.feed.has_next() {
            if self.options.max_observations.is_some_and(|max| observations >= max) {
                tracing::info!(observations, "Observation limit reached. Stopping.");
                break;
            }
            if observations > 0 {
                if let Some(pacing) = self.options.pacing {
                    self.wait(pacing);
                    if !self.feed.has_next() {
                        tracing::info!(observations, "Feed stopped while waiting. Stopping.");
                        break;
                    }
                }
            }

            let observation = self.pull()?;
            observations += 1;
            first.get_or_insert(observation);
            last = Some(observation);

            tracing::debug!(time = %observation.timestamp, price = %observation.price, "Observation received.");

            if let Some(event) = self.strategy.process_price(&observation) {
                self.on_event(&event);
            }
        }

        let report = RunReport::calculate(RunSummary {
            symbol: &self.symbol,
            strategy: self.strategy.name(),
            observations,
            first: first.as_ref(),
            last: last.as_ref(),
            trades: &self.logger.trades,
            total_realized_profit: self.strategy.total_realized_profit(),
            final_position: self.strategy.position(),
        });

        tracing::info!(
            observations,
            trades = report.total_trades,
            realized_profit = %report.total_realized_profit,
            position = ?report.final_position,
            "Run finished."
        );
        Ok(report)
    }

    /// Sleeps for `pacing`, waking early once the feed reports no more data.
    fn wait(&self, pacing: Duration) {
        const SLICE: Duration = Duration::from_millis(100);
        let deadline = Instant::now() + pacing;
        while self.feed.has_next() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep((deadline - now).min(SLICE));
        }
    }

    /// Pulls the next observation, retrying an unavailable source if configured.
    fn pull(&mut self) -> Result<Observation> {
        let Some(policy) = self.options.retry.clone() else {
            return Ok(self.feed.next()?);
        };

        let backoff = ExponentialBackoff {
            initial_interval: policy.initial_interval,
            max_interval: policy.max_interval,
            max_elapsed_time: Some(policy.max_elapsed),
            ..ExponentialBackoff::default()
        };
        let feed = &mut self.feed;

        let observation = backoff::retry_notify(
            backoff,
            || {
                feed.next().map_err(|err| match err {
                    price_feed::Error::Unavailable(_) => backoff::Error::transient(err),
                    other => backoff::Error::permanent(other),
                })
            },
            |err: price_feed::Error, wait: Duration| {
                tracing::warn!(error = %err, retry_in = ?wait, "Price source unavailable. Retrying...");
            },
        )
        .map_err(|err| match err {
            backoff::Error::Permanent(err) | backoff::Error::Transient { err, .. } => err,
        })?;

        Ok(observation)
    }

    fn on_event(&mut self, event: &TradeEvent) {
        self.logger.record(&self.symbol, event);
        let realized = self.strategy.total_realized_profit();
        match event {
            TradeEvent::Opened { timestamp, price } => {
                tracing::info!(symbol = %self.symbol, time = %timestamp, price = %price, "Opened position.");
            }
            TradeEvent::Closed { timestamp, price, profit, .. } => {
                tracing::info!(
                    symbol = %self.symbol,
                    time = %timestamp,
                    price = %price,
                    profit = %profit,
                    total_profit = %realized,
                    "Closed position."
                );
            }
        }
    }
}
