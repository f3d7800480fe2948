//! Backtest report generation

use crate::backtest::engine::BacktestConfig;
use crate::backtest::MarketScore;
use crate::evaluate::{evaluate, EvaluationMetrics};
use crate::store::TradeLogEntry;
use crate::strategy::Signal;

/// Outcome of one backtest: the replayed log, derived metrics and the
/// market-condition score.
#[derive(Debug, Clone)]
pub struct BacktestReport {
    pub strategy: String,
    pub symbol: String,
    pub interval: String,
    pub bars_replayed: usize,
    pub log: Vec<TradeLogEntry>,
    pub metrics: EvaluationMetrics,
    pub market_score: MarketScore,
}

impl BacktestReport {
    pub(crate) fn new(
        config: BacktestConfig,
        bars_replayed: usize,
        log: Vec<TradeLogEntry>,
        market_score: MarketScore,
    ) -> Self {
        let metrics = evaluate(&log);
        Self {
            strategy: config.strategy,
            symbol: config.symbol,
            interval: config.interval,
            bars_replayed,
            log,
            metrics,
            market_score,
        }
    }

    fn count(&self, action: Signal) -> usize {
        self.log.iter().filter(|e| e.action == action).count()
    }

    /// Format report as string
    pub fn format(&self) -> String {
        let metric = |key: &str| {
            self.metrics
                .get(key)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "n/a".to_string())
        };
        format!(
            r#"
Backtest Results
================
Strategy: {} on {} ({})
Bars Replayed: {}
Buys: {} (suppressed: {})
Sells: {} (suppressed: {})
Total Return: {}%
Win Rate: {}%
Profit Factor: {}
Maximum Drawdown: {}%
Sharpe Ratio: {}
Market Condition Score: {:.1}/100 (trend {:.1}, volatility {:.1}, momentum {:.1}, extremity {:.1})
"#,
            self.strategy,
            self.symbol,
            self.interval,
            self.bars_replayed,
            self.count(Signal::Buy),
            self.count(Signal::InvalidBuy),
            self.count(Signal::Sell),
            self.count(Signal::InvalidSell),
            metric("total_return"),
            metric("win_rate"),
            metric("profit_factor"),
            metric("max_drawdown"),
            metric("sharpe_ratio"),
            self.market_score.score,
            self.market_score.trend,
            self.market_score.volatility,
            self.market_score.momentum,
            self.market_score.extremity,
        )
    }
}
