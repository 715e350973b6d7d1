// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Invalid price {0}: prices must be finite, non-negative and at most 10^15")]
    InvalidPrice(String),
}

pub type Result<T> = std::result::Result<T, Error>;
