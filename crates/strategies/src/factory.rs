// In crates/strategies/src/factory.rs

use crate::error::{Error, Result};
use crate::ma_crossover::MACrossover;
use crate::types::MACrossoverSettings;
use crate::Strategy;
use core_types::StrategyConfig;

/// Builds the strategy named in `config` from its `params` table.
pub fn create_strategy(config: &StrategyConfig) -> Result<Box<dyn Strategy + Send>> {
    let strategy: Box<dyn Strategy + Send> = match config.name.as_str() {
        "ma_crossover" => {
            let settings: MACrossoverSettings = config.params.clone().try_into()?;
            Box::new(MACrossover::new(settings)?)
        }
        unknown => return Err(Error::UnknownStrategy(unknown.to_string())),
    };
    Ok(strategy)
}
