// In crates/price-feed/src/error.rs

use thiserror::Error;

/// Boxed error from a market-data collaborator.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Historical feed exhausted after {len} observations")]
    Exhausted { len: usize },

    #[error("Price source unavailable: {0}")]
    Unavailable(#[source] SourceError),

    #[error(transparent)]
    InvalidPrice(#[from] core_types::Error),

    #[error("Invalid day range: start {start} is after end {end}")]
    InvalidRange { start: chrono::NaiveDate, end: chrono::NaiveDate },
}

impl Error {
    pub fn unavailable<E>(err: E) -> Self
    where
        E: Into<SourceError>,
    {
        Error::Unavailable(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
