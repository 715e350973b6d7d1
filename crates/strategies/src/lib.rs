// In crates/strategies/src/lib.rs

use core_types::{Observation, Position, TradeEvent};
use rust_decimal::Decimal;

pub mod error;
pub mod factory;
pub mod ma_crossover;
pub mod types;
pub mod window;

pub use error::{Error, Result};

/// The universal interface for a trading strategy.
///
/// A strategy consumes market observations one at a time, in chronological
/// order, and decides when to open or close its single position. It is a
/// stateful entity: everything it needs to remember between observations
/// (price windows, the open position, realized profit) lives inside it and is
/// only exposed through read accessors.
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    /// Feeds the next observation into the strategy.
    ///
    /// Returns the state transition that fired on this observation, if any.
    fn process_price(&mut self, observation: &Observation) -> Option<TradeEvent>;

    /// The position currently held.
    fn position(&self) -> Position;

    /// Sum of the profit of every completed round trip so far.
    fn total_realized_profit(&self) -> Decimal;
}
