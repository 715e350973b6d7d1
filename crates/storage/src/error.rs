// In crates/storage/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access data file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed data file: {0}")]
    FormatError(#[from] serde_json::Error),

    #[error("Data file holds {found}, not {requested}")]
    SymbolMismatch { requested: String, found: String },

    #[error("A data file has no live price")]
    NoLivePrice,
}

pub type Result<T> = std::result::Result<T, Error>;
