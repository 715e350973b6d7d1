// In app/src/options.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use core_types::StrategyConfig;
use price_feed::DayRange;
use strategies::Strategy;

/// Strategy window overrides shared by every subcommand that trades.
#[derive(Args, Debug, Clone, Default)]
pub struct StrategyArgs {
    /// Number of prices in the short moving average.
    #[arg(long)]
    pub short_window: Option<usize>,

    /// Number of prices in the long moving average.
    #[arg(long)]
    pub long_window: Option<usize>,
}

/// The day range of a historical request.
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Replay the last N whole days, ending yesterday.
    #[arg(long, conflicts_with_all = ["start_date", "end_date"])]
    pub days: Option<u64>,

    /// The start date in YYYY-MM-DD format.
    #[arg(long, requires = "end_date")]
    pub start_date: Option<String>,

    /// The end date in YYYY-MM-DD format.
    #[arg(long, requires = "start_date")]
    pub end_date: Option<String>,
}

impl RangeArgs {
    /// Resolves explicit dates, else a trailing window of `days` (or `default_days`).
    pub fn resolve(&self, default_days: u64, today: NaiveDate) -> Result<DayRange> {
        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => {
                let range = DayRange::new(parse_date(start)?, parse_date(end)?)?;
                Ok(range)
            }
            _ => Ok(DayRange::trailing(self.days.unwrap_or(default_days), today)),
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse date '{value}', expected YYYY-MM-DD"))
}

/// Builds the configured strategy, applying any window overrides from the CLI.
pub fn build_strategy(config: &StrategyConfig, args: &StrategyArgs) -> Result<Box<dyn Strategy + Send>> {
    let mut config = config.clone();
    if let Some(params) = config.params.as_table_mut() {
        if let Some(short) = args.short_window {
            params.insert("short_window".to_string(), toml::Value::Integer(short as i64));
        }
        if let Some(long) = args.long_window {
            params.insert("long_window".to_string(), toml::Value::Integer(long as i64));
        }
    }
    let strategy = strategies::factory::create_strategy(&config)
        .with_context(|| format!("Cannot build strategy '{}'", config.name))?;
    Ok(strategy)
}
