// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::window::MAX_WINDOW;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MACrossoverSettings {
    /// Number of most recent prices in the fast moving average.
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Number of most recent prices in the slow moving average.
    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

impl MACrossoverSettings {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self { short_window, long_window }
    }

    /// Checks `0 < short_window < long_window <= MAX_WINDOW`.
    pub fn validate(&self) -> Result<()> {
        if self.short_window == 0 {
            return Err(Error::InvalidConfig(
                "short_window must be greater than 0".to_string(),
            ));
        }
        if self.long_window <= self.short_window {
            return Err(Error::InvalidConfig(format!(
                "long_window ({}) must be greater than short_window ({})",
                self.long_window, self.short_window
            )));
        }
        if self.long_window > MAX_WINDOW {
            return Err(Error::InvalidConfig(format!(
                "long_window ({}) must be at most {MAX_WINDOW}",
                self.long_window
            )));
        }
        Ok(())
    }
}

impl Default for MACrossoverSettings {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
        }
    }
}

fn default_short_window() -> usize { 50 }
fn default_long_window() -> usize { 100 }
