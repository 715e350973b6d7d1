// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid strategy configuration: {0}")]
    InvalidConfig(String),

    #[error("Attempted to create unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Failed to parse strategy parameters: {0}")]
    InvalidParams(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
