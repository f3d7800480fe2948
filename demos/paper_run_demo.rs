//! Start a short paper run against the simulated exchange, then stop it and
//! print the evaluation.
//!
//! Run with: cargo run --example paper_run_demo

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tactician::config::RunConfig;
use tactician::exchange::SimulatedExchange;
use tactician::store::InMemoryStore;
use tactician::TradingEngine;

#[tokio::main]
async fn main() -> tactician::Result<()> {
    tracing_subscriber::fmt::init();

    let gateway = Arc::new(SimulatedExchange::new(30_000.0));
    let store = Arc::new(InMemoryStore::new());
    let engine = TradingEngine::new(gateway, store);

    let mut config = RunConfig::new("rsi", "BTCUSDT");
    config.interval = "1s".to_string();
    config.capital = 1_000.0;
    config.dataset_size = 50;
    config.params = json!({ "period": 14, "oversold": 35.0, "overbought": 65.0 });

    let run_id = engine.start(config).await?;
    println!("started run {}", run_id);

    tokio::time::sleep(Duration::from_secs(30)).await;
    engine.stop(&run_id).await?;

    let metrics = engine.evaluate_run(&run_id).await?;
    println!("metrics: {}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}
