// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::Settings;
use chrono::Utc;
use clap::{Parser, Subcommand};
use core_types::{Position, Symbol};
use engine::report::RunReport;
use engine::{Engine, EngineOptions, RetryPolicy};
use price_feed::{HistoricalFeed, LiveFeed, MarketDataProvider, StopHandle};
use std::path::PathBuf;
use std::time::Duration;
use storage::JsonFileStore;
use tracing_subscriber::EnvFilter;

mod options;
use crate::options::{RangeArgs, StrategyArgs, build_strategy};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A dual moving-average crossover trader for Crypto.com Exchange spot pairs.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replays daily closing prices through the strategy.
    Backtest {
        /// The instrument to replay (e.g., "ETH_USDT"). Defaults to the configured symbol.
        #[arg(short, long)]
        symbol: Option<String>,

        #[command(flatten)]
        range: RangeArgs,

        /// Replay a series saved with `fetch` instead of downloading one.
        #[arg(long)]
        data_file: Option<PathBuf>,

        #[command(flatten)]
        strategy: StrategyArgs,

        /// Write the full run report as JSON to this file.
        #[arg(long)]
        trades_out: Option<PathBuf>,
    },

    /// Polls the current price and trades on it until stopped.
    Live {
        /// The instrument to trade (e.g., "ETH_USDT"). Defaults to the configured symbol.
        #[arg(short, long)]
        symbol: Option<String>,

        /// Seconds between two price polls.
        #[arg(long)]
        poll_interval_secs: Option<u64>,

        /// Stop after this many polls.
        #[arg(long)]
        max_polls: Option<u64>,

        #[command(flatten)]
        strategy: StrategyArgs,
    },

    /// Downloads daily closing prices and saves them to a JSON file.
    Fetch {
        /// The instrument to download (e.g., "ETH_USDT"). Defaults to the configured symbol.
        #[arg(short, long)]
        symbol: Option<String>,

        #[command(flatten)]
        range: RangeArgs,

        /// Where to write the series.
        #[arg(long)]
        out: PathBuf,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Parse the command line first so `--help` works without a config directory.
    let cli = Cli::parse();

    // Load .env file
    dotenvy::dotenv().ok();

    let settings = app_config::load_settings().context("Failed to load configuration")?;

    // Initialize logging. RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(environment = %settings.app.environment, "Configuration loaded.");

    match cli.command {
        Commands::Backtest { symbol, range, data_file, strategy, trades_out } => {
            handle_backtest(&settings, symbol, range, data_file, strategy, trades_out)
        }
        Commands::Live { symbol, poll_interval_secs, max_polls, strategy } => {
            handle_live(&settings, symbol, poll_interval_secs, max_polls, strategy)
        }
        Commands::Fetch { symbol, range, out } => handle_fetch(&settings, symbol, range, out),
    }
}

// --- "Backtest" Subcommand Logic ---

/// Handles the logic for the `backtest` subcommand.
fn handle_backtest(
    settings: &Settings,
    symbol: Option<String>,
    range: RangeArgs,
    data_file: Option<PathBuf>,
    strategy_args: StrategyArgs,
    trades_out: Option<PathBuf>,
) -> Result<()> {
    // --- 1. Initialization & Configuration ---
    let symbol = resolve_symbol(settings, symbol);
    let range = range.resolve(settings.feed.historical_day_range, Utc::now().date_naive())?;
    let strategy = build_strategy(&settings.strategy, &strategy_args)?;

    // --- 2. Load the Price History ---
    let feed = match data_file.or_else(|| settings.feed.data_file.as_ref().map(PathBuf::from)) {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading history from file.");
            HistoricalFeed::load(&JsonFileStore::new(path), &symbol, range)?
        }
        None => {
            tracing::info!(start = %range.start, end = %range.end, "Downloading history.");
            let client = api_client::new(&settings.market_data)?;
            HistoricalFeed::load(&client, &symbol, range)?
        }
    };
    tracing::info!(%symbol, observations = feed.len(), "History loaded.");

    // --- 3. Run the Replay ---
    let mut engine = Engine::new(symbol, Box::new(feed), strategy);
    let report = engine.run()?;

    // --- 4. Print and Save the Results ---
    print_report(&report);

    if let Some(path) = trades_out {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Report saved.");
    }

    Ok(())
}

// --- "Live" Subcommand Logic ---

/// Handles the logic for the `live` subcommand.
fn handle_live(
    settings: &Settings,
    symbol: Option<String>,
    poll_interval_secs: Option<u64>,
    max_polls: Option<u64>,
    strategy_args: StrategyArgs,
) -> Result<()> {
    let symbol = resolve_symbol(settings, symbol);
    let strategy = build_strategy(&settings.strategy, &strategy_args)?;
    let client = api_client::new(&settings.market_data)?;

    let poll_interval = poll_interval_secs.unwrap_or(settings.feed.poll_interval_secs);
    let options = EngineOptions {
        pacing: Some(Duration::from_secs(poll_interval)),
        max_observations: max_polls,
        retry: Some(RetryPolicy {
            max_elapsed: Duration::from_secs(settings.feed.max_retry_elapsed_secs),
            ..RetryPolicy::default()
        }),
    };

    let feed = LiveFeed::new(client, symbol);
    stop_on_ctrl_c(feed.stop_handle())?;

    tracing::info!(symbol = %feed.symbol(), poll_interval, ?max_polls, "Starting live trading. Press Ctrl-C to stop.");

    let mut engine = Engine::new(feed.symbol().clone(), Box::new(feed), strategy).with_options(options);
    let report = engine.run()?;

    print_report(&report);
    Ok(())
}

/// Stops the live feed on Ctrl-C so the run ends normally and reports.
fn stop_on_ctrl_c(stop: StopHandle) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the signal listener")?;

    std::thread::spawn(move || {
        runtime.block_on(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::warn!("Ctrl-C received. Stopping after the current poll...");
                    stop.stop();
                }
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C."),
            }
        });
    });
    Ok(())
}

// --- "Fetch" Subcommand Logic ---

/// Handles the logic for the `fetch` subcommand.
fn handle_fetch(settings: &Settings, symbol: Option<String>, range: RangeArgs, out: PathBuf) -> Result<()> {
    let symbol = resolve_symbol(settings, symbol);
    let range = range.resolve(settings.feed.historical_day_range, Utc::now().date_naive())?;
    let client = api_client::new(&settings.market_data)?;

    tracing::info!(%symbol, start = %range.start, end = %range.end, "Fetching daily closes...");
    let series = client.fetch_historical_series(&symbol, range)?;

    let store = JsonFileStore::new(out);
    store.save(&symbol, &series)?;
    tracing::info!(count = series.len(), path = %store.path().display(), "Series saved.");

    Ok(())
}

// --- Helpers ---

fn resolve_symbol(settings: &Settings, symbol: Option<String>) -> Symbol {
    Symbol(symbol.unwrap_or_else(|| settings.feed.symbol.clone()))
}

fn print_report(report: &RunReport) {
    println!("\n--- Run Complete ---");
    println!("--------------------");
    println!("Symbol:            {}", report.symbol);
    println!("Strategy:          {}", report.strategy);
    println!("Observations:      {}", report.observations);
    if let (Some(first), Some(last)) = (report.first_timestamp, report.last_timestamp) {
        println!("Period:            {} -> {}", first.date_naive(), last.date_naive());
    }
    println!("--------------------");
    println!("Total Trades:      {}", report.total_trades);
    println!(
        "Win Rate:          {:.2}% ({} won, {} lost)",
        report.win_rate, report.winning_trades, report.losing_trades
    );
    if let (Some(best), Some(worst)) = (report.best_trade, report.worst_trade) {
        println!("Best / Worst:      {best} / {worst}");
    }
    println!("Realized Profit:   {}", report.total_realized_profit);
    match report.final_position {
        Position::Flat => println!("Final Position:    flat"),
        Position::Long { entry_price, entry_time } => {
            println!("Final Position:    long since {} at {}", entry_time.date_naive(), entry_price);
            println!("Unrealized Profit: {}", report.unrealized_profit);
        }
    }
    println!("--------------------");

    for trade in &report.trades {
        println!(
            "  {} -> {} | {} -> {} | P&L {}",
            trade.entry_time.date_naive(),
            trade.exit_time.date_naive(),
            trade.entry_price,
            trade.exit_price,
            trade.pnl
        );
    }
}
