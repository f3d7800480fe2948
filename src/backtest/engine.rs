//! Historical replay engine
//!
//! Replays a strategy over a paged historical fetch exactly the way the live
//! loop would see it: same window capacity, one strategy call per step, same
//! consecutive-signal invalidation. No capital or position ledger is touched;
//! the output is a trade log plus derived metrics and a market score.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::backtest::{market_condition_score, BacktestReport};
use crate::config::interval_to_seconds;
use crate::data::{Bar, Window};
use crate::exchange::{ExchangeGateway, OrderSide};
use crate::store::TradeLogEntry;
use crate::strategy::{Signal, StrategyRegistry};
use crate::Result;

/// Maximum rows per historical query; larger samples are fetched in pages.
const PAGE_LIMIT: usize = 500;

/// Minimum total sample regardless of window size.
const MIN_SAMPLE: usize = 240;

/// Parameters for one backtest.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub strategy: String,
    pub params: Value,
    pub symbol: String,
    pub interval: String,
    /// Window capacity fed to the strategy per step
    pub window_size: usize,
    /// Total bars to replay; defaults to `max(4 * window_size, 240)`
    pub sample_size: Option<usize>,
    /// Series end; defaults to now
    pub end_time: Option<DateTime<Utc>>,
}

impl BacktestConfig {
    pub fn new(strategy: &str, symbol: &str) -> Self {
        Self {
            strategy: strategy.to_string(),
            params: Value::Null,
            symbol: symbol.to_string(),
            interval: "1m".to_string(),
            window_size: 100,
            sample_size: None,
            end_time: None,
        }
    }

    fn effective_sample(&self) -> usize {
        self.sample_size
            .unwrap_or_else(|| (4 * self.window_size).max(MIN_SAMPLE))
    }
}

/// Replays strategies against historical data from a gateway.
pub struct Backtester {
    gateway: Arc<dyn ExchangeGateway>,
}

impl Backtester {
    pub fn new(gateway: Arc<dyn ExchangeGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch, replay, score.
    pub async fn run(
        &self,
        strategies: &StrategyRegistry,
        config: BacktestConfig,
    ) -> Result<BacktestReport> {
        if config.window_size < 2 {
            anyhow::bail!("window_size must be at least 2, got {}", config.window_size);
        }
        let mut strategy = strategies.create(&config.strategy, &config.params)?;

        let bars = self.fetch_series(&config).await?;
        if bars.len() <= config.window_size {
            anyhow::bail!(
                "not enough history to replay: got {} bars for window size {}",
                bars.len(),
                config.window_size
            );
        }
        info!(
            strategy = %config.strategy,
            symbol = %config.symbol,
            bars = bars.len(),
            "backtest replay starting"
        );

        let mut window = Window::new(config.window_size);
        let mut log: Vec<TradeLogEntry> = Vec::new();
        let mut last_action: Option<OrderSide> = None;

        for bar in &bars {
            window.slide(bar.clone());
            if !window.is_full() {
                continue;
            }

            let raw = strategy.generate_signals(&window);
            // Same suppression the live guard applies, tracked without a
            // ledger: a buy needs a non-buy last action, a sell needs an
            // open buy.
            let action = match raw {
                Signal::Buy if last_action == Some(OrderSide::Buy) => Signal::InvalidBuy,
                Signal::Sell if last_action != Some(OrderSide::Buy) => Signal::InvalidSell,
                other => other,
            };
            match action {
                Signal::Buy => last_action = Some(OrderSide::Buy),
                Signal::Sell => last_action = Some(OrderSide::Sell),
                _ => {}
            }

            log.push(TradeLogEntry {
                timestamp: bar.timestamp,
                price: bar.close,
                action,
                order_id: None,
                quote_amount: None,
                status: "backtest".to_string(),
            });
        }

        let score = market_condition_score(&bars);
        Ok(BacktestReport::new(config, bars.len(), log, score))
    }

    /// Fetch the full sample oldest-first in bounded pages, since one
    /// historical query caps out at `PAGE_LIMIT` rows.
    async fn fetch_series(&self, config: &BacktestConfig) -> Result<Vec<Bar>> {
        let total = config.effective_sample();
        let step = interval_to_seconds(&config.interval) as i64;
        let end = config.end_time.unwrap_or_else(Utc::now);

        let mut bars = Vec::with_capacity(total);
        let mut remaining = total;
        while remaining > 0 {
            let page = remaining.min(PAGE_LIMIT);
            let start = end - Duration::seconds(step * remaining as i64);
            let chunk = self
                .gateway
                .get_window_data(&config.symbol, &config.interval, page, Some(start))
                .await?;
            remaining -= page;
            if chunk.is_empty() {
                warn!(
                    symbol = %config.symbol,
                    remaining,
                    "historical page came back empty, truncating sample"
                );
                continue;
            }
            bars.extend(chunk);
        }
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::SimulatedExchange;

    #[tokio::test]
    async fn test_replay_produces_one_entry_per_full_window_step() {
        let backtester = Backtester::new(Arc::new(SimulatedExchange::new(100.0)));
        let registry = StrategyRegistry::new();

        let mut config = BacktestConfig::new("rsi", "BTCUSDT");
        config.window_size = 50;
        config.sample_size = Some(300);

        let report = backtester.run(&registry, config).await.unwrap();
        assert_eq!(report.bars_replayed, 300);
        // First window_size - 1 bars only fill the window
        assert_eq!(report.log.len(), 300 - 49);
    }

    #[tokio::test]
    async fn test_no_consecutive_executed_buys() {
        let backtester = Backtester::new(Arc::new(SimulatedExchange::new(100.0)));
        let registry = StrategyRegistry::new();

        let mut config = BacktestConfig::new("rsi", "BTCUSDT");
        config.window_size = 30;
        config.sample_size = Some(600);

        let report = backtester.run(&registry, config).await.unwrap();
        let mut last = None;
        for entry in &report.log {
            match entry.action {
                Signal::Buy => {
                    assert_ne!(last, Some(Signal::Buy), "consecutive BUY escaped the guard");
                    last = Some(Signal::Buy);
                }
                Signal::Sell => {
                    assert_eq!(last, Some(Signal::Buy), "SELL without an open BUY");
                    last = Some(Signal::Sell);
                }
                _ => {}
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_strategy_fails_fast() {
        let backtester = Backtester::new(Arc::new(SimulatedExchange::new(100.0)));
        let registry = StrategyRegistry::new();
        let config = BacktestConfig::new("nope", "BTCUSDT");
        assert!(backtester.run(&registry, config).await.is_err());
    }
}
