// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, FeedSettings, MarketDataSettings, Settings};

/// Loads the application settings from the `config/` directory.
///
/// The environment name is read from `APP_ENVIRONMENT` and defaults to
/// "development".
pub fn load_settings() -> Result<Settings> {
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(Path::new("config"), &environment)
}

/// Loads settings from `dir`.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings_from(dir: &Path, environment: &str) -> Result<Settings> {
    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::from(dir.join("base.toml")))
        // 2. Load the environment-specific configuration file.
        .add_source(File::from(dir.join(format!("{environment}.toml"))).required(false))
        // 3. Load settings from environment variables (e.g., `APP_FEED__SYMBOL=...`).
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let settings: Settings = settings.try_deserialize()?;

    Ok(settings)
}
