// In crates/core-types/src/types.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A trading instrument identifier (e.g., "BTC_USDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol(value.to_string())
    }
}

/// Number of decimal places a price is kept to.
pub const PRICE_SCALE: u32 = 12;

/// Largest accepted price.
///
/// With prices capped at this bound and rounded to `PRICE_SCALE`, a window of
/// prices sums exactly in fixed point.
pub const MAX_PRICE: i64 = 1_000_000_000_000_000;

/// A single timestamped price sample.
///
/// Observations are immutable once built. Prices are held as `Decimal` so that
/// averages over identical prices compare exactly equal. Deserialization goes
/// through the same checks as [`Observation::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawObservation")]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

#[derive(Deserialize)]
struct RawObservation {
    timestamp: DateTime<Utc>,
    price: Decimal,
}

impl TryFrom<RawObservation> for Observation {
    type Error = Error;

    fn try_from(raw: RawObservation) -> Result<Self> {
        Observation::new(raw.timestamp, raw.price)
    }
}

impl Observation {
    /// Builds an observation, rounding the price to `PRICE_SCALE` places.
    ///
    /// This is the boundary where negative prices and prices above
    /// `MAX_PRICE` are rejected, so nothing downstream has to re-check them.
    pub fn new(timestamp: DateTime<Utc>, price: Decimal) -> Result<Self> {
        if price < Decimal::ZERO || price > Decimal::from(MAX_PRICE) {
            return Err(Error::InvalidPrice(price.to_string()));
        }
        Ok(Self {
            timestamp,
            price: price.round_dp(PRICE_SCALE),
        })
    }

    /// Builds an observation from a floating-point price.
    ///
    /// NaN and infinities are rejected on top of the checks of [`Observation::new`].
    pub fn from_f64(timestamp: DateTime<Utc>, price: f64) -> Result<Self> {
        if !price.is_finite() {
            return Err(Error::InvalidPrice(price.to_string()));
        }
        let value = Decimal::from_f64(price).ok_or_else(|| Error::InvalidPrice(price.to_string()))?;
        Self::new(timestamp, value)
    }
}

/// The position currently held by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum Position {
    /// No open position.
    #[default]
    Flat,
    /// A single long position opened at `entry_price`.
    Long {
        entry_price: Decimal,
        entry_time: DateTime<Utc>,
    },
}

impl Position {
    pub fn is_flat(&self) -> bool {
        matches!(self, Position::Flat)
    }

    pub fn entry_price(&self) -> Option<Decimal> {
        match self {
            Position::Flat => None,
            Position::Long { entry_price, .. } => Some(*entry_price),
        }
    }
}

/// A state transition produced by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TradeEvent {
    /// Golden cross: a long position was opened.
    Opened {
        timestamp: DateTime<Utc>,
        price: Decimal,
    },
    /// Death cross: the open position was closed and its profit realized.
    Closed {
        timestamp: DateTime<Utc>,
        price: Decimal,
        entry_price: Decimal,
        profit: Decimal,
    },
}
