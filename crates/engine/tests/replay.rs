use chrono::{DateTime, Duration, TimeZone, Utc};
use core_types::{Observation, Position, Symbol, TradeEvent};
use engine::{Engine, EngineOptions};
use price_feed::{HistoricalFeed, PriceFeed};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use strategies::ma_crossover::MACrossover;
use strategies::types::MACrossoverSettings;

fn day(i: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(i as i64)
}

fn feed(prices: &[i64]) -> HistoricalFeed {
    HistoricalFeed::new(
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| Observation::new(day(i), Decimal::from(*p)).unwrap())
            .collect(),
    )
}

fn engine(prices: &[i64], short: usize, long: usize) -> Engine {
    let strategy = MACrossover::new(MACrossoverSettings::new(short, long)).unwrap();
    Engine::new(Symbol::from("ETH_USDT"), Box::new(feed(prices)), Box::new(strategy))
}

#[test]
fn replays_the_reference_scenario_to_completion() {
    let mut engine = engine(&[10, 10, 10, 20, 20, 20, 5, 5, 5], 2, 3);
    let report = engine.run().unwrap();

    assert_eq!(
        engine.events(),
        &[
            TradeEvent::Opened { timestamp: day(3), price: dec!(20) },
            TradeEvent::Closed {
                timestamp: day(6),
                price: dec!(5),
                entry_price: dec!(20),
                profit: dec!(-15),
            },
        ]
    );
    assert_eq!(report.observations, 9);
    assert_eq!(report.total_trades, 1);
    assert_eq!(report.losing_trades, 1);
    assert_eq!(report.total_realized_profit, dec!(-15));
    assert_eq!(report.final_position, Position::Flat);
    assert_eq!(report.trades[0].entry_time, day(3));
    assert_eq!(report.trades[0].exit_time, day(6));
    assert_eq!(report.first_timestamp, Some(day(0)));
    assert_eq!(report.last_timestamp, Some(day(8)));
}

#[test]
fn unclosed_position_is_reported_but_not_realized() {
    let mut engine = engine(&[10, 10, 10, 20, 25, 30], 2, 3);
    let report = engine.run().unwrap();

    assert_eq!(report.total_trades, 0);
    assert_eq!(report.total_realized_profit, Decimal::ZERO);
    assert_eq!(report.final_position.entry_price(), Some(dec!(20)));
    assert_eq!(report.unrealized_profit, dec!(10));
}

#[test]
fn constant_series_produces_no_events() {
    let mut engine = engine(&[42; 30], 5, 10);
    let report = engine.run().unwrap();
    assert!(engine.events().is_empty());
    assert_eq!(report.observations, 30);
    assert_eq!(report.total_realized_profit, Decimal::ZERO);
}

#[test]
fn empty_feed_finishes_immediately() {
    let mut engine = engine(&[], 2, 3);
    let report = engine.run().unwrap();
    assert_eq!(report.observations, 0);
    assert_eq!(report.last_price, None);
}

#[test]
fn observation_limit_stops_early() {
    let strategy = MACrossover::new(MACrossoverSettings::new(2, 3)).unwrap();
    let mut engine = Engine::new(
        Symbol::from("ETH_USDT"),
        Box::new(feed(&[10, 10, 10, 20, 20, 20, 5, 5, 5])),
        Box::new(strategy),
    )
    .with_options(EngineOptions {
        max_observations: Some(5),
        ..EngineOptions::default()
    });

    let report = engine.run().unwrap();
    assert_eq!(report.observations, 5);
    assert_eq!(report.final_position.entry_price(), Some(dec!(20)));
    assert_eq!(report.last_price, Some(dec!(20)));
}

#[test]
fn realized_profit_matches_sum_of_round_trips() {
    let prices = [
        100, 102, 105, 103, 99, 95, 97, 101, 108, 112, 109, 104, 100, 98, 103, 107, 111, 115, 110, 102,
    ];
    let mut engine = engine(&prices, 2, 4);
    let report = engine.run().unwrap();

    let summed: Decimal = report.trades.iter().map(|t| t.exit_price - t.entry_price).sum();
    assert!(report.total_trades > 0);
    assert_eq!(report.total_realized_profit, summed);

    // Opens and closes strictly alternate.
    for pair in engine.events().windows(2) {
        let both_open = matches!(pair, [TradeEvent::Opened { .. }, TradeEvent::Opened { .. }]);
        let both_closed = matches!(pair, [TradeEvent::Closed { .. }, TradeEvent::Closed { .. }]);
        assert!(!both_open && !both_closed);
    }
}

#[test]
fn feed_is_exhausted_after_a_run() {
    let mut feed = feed(&[1, 2, 3]);
    for _ in 0..3 {
        feed.next().unwrap();
    }
    assert!(!feed.has_next());
    assert!(matches!(feed.next(), Err(price_feed::Error::Exhausted { len: 3 })));
}
