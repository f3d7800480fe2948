//! Tactician-RS: a scheduled execution engine for trading strategies
//!
//! This crate runs window-based indicator strategies against an abstract
//! exchange gateway. Each run owns its own capital/position ledger and ticks on
//! a fixed schedule in its own background task; signals are converted into
//! guarded buy/sell orders with duplicate-order suppression, and every tick is
//! appended to a trade log that the evaluator can score later.
//!
//! # Features
//!
//! - **Strategy Engine**: window-recomputing strategies behind a single trait,
//!   selected from a name-keyed registry
//! - **Live Execution**: one scheduled task per run with cooperative stop and
//!   crash-safe ledger accounting
//! - **Backtesting**: historical replay producing the same trade-log shape as
//!   live execution, plus a market-condition score
//! - **Evaluation**: drawdown, Sharpe/Sortino/Calmar, win rate and profit
//!   factor derived from any trade log
//!
//! # Example
//!
//! ```no_run
//! use tactician::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let gateway = Arc::new(SimulatedExchange::new(100.0));
//!     let store = Arc::new(InMemoryStore::new());
//!     let engine = TradingEngine::new(gateway, store);
//!     let run_id = engine.start(RunConfig::new("rsi", "BTCUSDT")).await?;
//!     engine.stop(&run_id).await?;
//!     Ok(())
//! }
//! ```

pub mod backtest;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod exchange;
pub mod store;
pub mod strategy;

pub use engine::TradingEngine;

// Re-export commonly used types
pub mod prelude {
    pub use crate::backtest::*;
    pub use crate::config::*;
    pub use crate::data::*;
    // engine and strategy both have a `registry` submodule; re-export their
    // items by name so the prelude stays unambiguous
    pub use crate::engine::{RunHandle, RunState, RuntimeRegistry, Tactician, TradingEngine};
    pub use crate::error::*;
    pub use crate::evaluate::*;
    pub use crate::exchange::*;
    pub use crate::store::*;
    pub use crate::strategy::{
        BollingerStrategy, EmaCrossStrategy, MacdStrategy, RsiStrategy, Signal, Strategy,
        StrategyFactory, StrategyRegistry,
    };

    pub use anyhow::{Context, Result};
}

/// Result type alias. The error side defaults to `anyhow::Error` but stays
/// overridable for the typed-error seams (`Result<BuyFill, OrderError>`).
pub type Result<T, E = anyhow::Error> = anyhow::Result<T, E>;
