// In crates/engine/src/report.rs

use crate::logger::Trade;
use chrono::{DateTime, Utc};
use core_types::{Observation, Position, Symbol};
use rust_decimal::Decimal;
use serde::Serialize;

/// A summary of one run of the engine.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub symbol: Symbol,
    pub strategy: String,
    /// Number of observations fed to the strategy.
    pub observations: u64,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub last_price: Option<Decimal>,

    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub win_rate: f64,
    pub best_trade: Option<Decimal>,
    pub worst_trade: Option<Decimal>,
    /// Sum of all completed round trips, as booked by the strategy.
    pub total_realized_profit: Decimal,

    /// The position still held when the run stopped.
    pub final_position: Position,
    /// Mark-to-market profit of `final_position` at `last_price`. Informational only.
    pub unrealized_profit: Decimal,

    pub trades: Vec<Trade>,
}

/// Everything `RunReport::calculate` needs from a finished run.
pub struct RunSummary<'a> {
    pub symbol: &'a Symbol,
    pub strategy: &'a str,
    pub observations: u64,
    pub first: Option<&'a Observation>,
    pub last: Option<&'a Observation>,
    pub trades: &'a [Trade],
    pub total_realized_profit: Decimal,
    pub final_position: Position,
}

impl RunReport {
    /// Calculates the report metrics from the recorded trades.
    pub fn calculate(summary: RunSummary<'_>) -> Self {
        let trades = summary.trades;
        let total_trades = trades.len() as u32;
        let winning_trades = trades.iter().filter(|t| t.pnl > Decimal::ZERO).count() as u32;
        let losing_trades = trades.iter().filter(|t| t.pnl < Decimal::ZERO).count() as u32;
        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        let last_price = summary.last.map(|obs| obs.price);
        let unrealized_profit = match (summary.final_position.entry_price(), last_price) {
            (Some(entry), Some(mark)) => mark - entry,
            _ => Decimal::ZERO,
        };

        Self {
            symbol: summary.symbol.clone(),
            strategy: summary.strategy.to_string(),
            observations: summary.observations,
            first_timestamp: summary.first.map(|obs| obs.timestamp),
            last_timestamp: summary.last.map(|obs| obs.timestamp),
            last_price,
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            best_trade: trades.iter().map(|t| t.pnl).max(),
            worst_trade: trades.iter().map(|t| t.pnl).min(),
            total_realized_profit: summary.total_realized_profit,
            final_position: summary.final_position,
            unrealized_profit,
            trades: trades.to_vec(),
        }
    }
}
