// In crates/strategies/src/ma_crossover.rs

use crate::error::Result;
use crate::types::MACrossoverSettings;
use crate::window::RollingWindow;
use crate::Strategy;
use core_types::{Observation, Position, TradeEvent};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// The stateful struct for the dual simple-moving-average crossover strategy.
///
/// Opens a long position on a golden cross (short MA strictly above long MA)
/// and closes it on a death cross (short MA strictly below long MA). Equal
/// averages never trade, and an open position is never re-opened or resized.
#[derive(Debug)]
pub struct MACrossover {
    /// The configuration for this strategy instance.
    settings: MACrossoverSettings,
    /// The trailing prices the averages are computed from.
    window: RollingWindow,
    /// The single position this strategy may hold.
    position: Position,
    /// Profit of every completed round trip.
    total_realized_profit: Decimal,
    observations_seen: u64,
}

impl MACrossover {
    /// Creates a new `MACrossover` strategy instance from its settings.
    ///
    /// Fails with `Error::InvalidConfig` unless `0 < short_window < long_window <= MAX_WINDOW`.
    pub fn new(settings: MACrossoverSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            window: RollingWindow::new(settings.short_window, settings.long_window),
            settings,
            position: Position::Flat,
            total_realized_profit: Decimal::ZERO,
            observations_seen: 0,
        })
    }

    pub fn short_window(&self) -> usize {
        self.settings.short_window
    }

    pub fn long_window(&self) -> usize {
        self.settings.long_window
    }

    pub fn observations_seen(&self) -> u64 {
        self.observations_seen
    }

    /// The latest `(short, long)` moving averages, once enough prices are in.
    pub fn moving_averages(&self) -> Option<(Decimal, Decimal)> {
        Some((self.window.short_mean()?, self.window.long_mean()?))
    }

    /// Profit the open position would realize at `mark_price`. Never booked.
    pub fn unrealized_profit(&self, mark_price: Decimal) -> Decimal {
        self.position
            .entry_price()
            .map_or(Decimal::ZERO, |entry| mark_price - entry)
    }
}

impl Strategy for MACrossover {
    fn name(&self) -> &'static str {
        "MACrossover"
    }

    fn process_price(&mut self, observation: &Observation) -> Option<TradeEvent> {
        // 1. Record the price.
        self.window.push(observation.price);
        self.observations_seen += 1;

        // 2. Not enough data to form a signal yet.
        let ordering = self.window.compare_means()?;

        // 3. The crossover state machine.
        match (self.position, ordering) {
            (Position::Flat, Ordering::Greater) => {
                self.position = Position::Long {
                    entry_price: observation.price,
                    entry_time: observation.timestamp,
                };
                Some(TradeEvent::Opened {
                    timestamp: observation.timestamp,
                    price: observation.price,
                })
            }
            (Position::Long { entry_price, .. }, Ordering::Less) => {
                let profit = observation.price - entry_price;
                self.total_realized_profit += profit;
                self.position = Position::Flat;
                Some(TradeEvent::Closed {
                    timestamp: observation.timestamp,
                    price: observation.price,
                    entry_price,
                    profit,
                })
            }
            // Ties, or a cross in the direction we are already positioned for.
            _ => None,
        }
    }

    fn position(&self) -> Position {
        self.position
    }

    fn total_realized_profit(&self) -> Decimal {
        self.total_realized_profit
    }
}
