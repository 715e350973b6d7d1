// In crates/engine/src/logger.rs

use chrono::{DateTime, Utc};
use core_types::{Symbol, TradeEvent};
use rust_decimal::Decimal;
use serde::Serialize;

/// A comprehensive record of a single completed round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub symbol: Symbol,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub pnl: Decimal,
}

/// A logger responsible for recording the events of a run.
#[derive(Debug, Default)]
pub struct TradeLogger {
    pub events: Vec<TradeEvent>,
    pub trades: Vec<Trade>,
    open_since: Option<DateTime<Utc>>,
}

impl TradeLogger {
    /// Creates a new, empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event, pairing each close with the open that preceded it.
    pub fn record(&mut self, symbol: &Symbol, event: &TradeEvent) {
        self.events.push(*event);
        match *event {
            TradeEvent::Opened { timestamp, .. } => {
                self.open_since = Some(timestamp);
            }
            TradeEvent::Closed { timestamp, price, entry_price, profit } => {
                self.trades.push(Trade {
                    symbol: symbol.clone(),
                    entry_time: self.open_since.take().unwrap_or(timestamp),
                    exit_time: timestamp,
                    entry_price,
                    exit_price: price,
                    pnl: profit,
                });
            }
        }
    }
}
