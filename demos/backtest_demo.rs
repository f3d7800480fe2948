//! Replay the RSI strategy over simulated history and print the report.
//!
//! Run with: cargo run --example backtest_demo

use std::sync::Arc;

use tactician::backtest::BacktestConfig;
use tactician::exchange::SimulatedExchange;
use tactician::store::InMemoryStore;
use tactician::TradingEngine;

#[tokio::main]
async fn main() -> tactician::Result<()> {
    tracing_subscriber::fmt::init();

    let gateway = Arc::new(SimulatedExchange::new(30_000.0));
    let store = Arc::new(InMemoryStore::new());
    let engine = TradingEngine::new(gateway, store);

    let mut config = BacktestConfig::new("rsi", "BTCUSDT");
    config.interval = "1m".to_string();
    config.window_size = 100;
    config.sample_size = Some(1_000);

    let report = engine.backtest(config).await?;
    println!("{}", report.format());
    Ok(())
}
