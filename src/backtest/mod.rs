//! Backtesting: historical replay and market-condition scoring

mod engine;
mod market_score;
mod report;

pub use engine::{BacktestConfig, Backtester};
pub use market_score::{market_condition_score, MarketScore};
pub use report::BacktestReport;
