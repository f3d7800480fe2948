//! Run metadata and trade-log persistence
//!
//! The engine only ever appends; reads serve the evaluator and listing
//! surfaces. Write idempotency is the backing store's concern.

pub mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::strategy::Signal;
use crate::Result;

/// One appended log row. Produced once per live tick (HOLD ticks included)
/// and once per backtest step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeLogEntry {
    /// Tick timestamp
    pub timestamp: DateTime<Utc>,
    /// Close price the decision was made against
    pub price: f64,
    /// Recorded action, after any guard downgrade
    pub action: Signal,
    /// Exchange order id when an order filled
    pub order_id: Option<String>,
    /// Quote amount moved by the fill
    pub quote_amount: Option<f64>,
    /// Outcome tag ("filled", "rejected", "hold", "backtest")
    pub status: String,
}

/// Registration record for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: String,
    pub symbol: String,
    pub initial_capital: f64,
    pub interval: String,
    pub trades_limit: u64,
    pub strategy_name: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only persistence contract for runs and their trade logs.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Record that a run exists.
    async fn register_run(&self, metadata: RunMetadata) -> Result<()>;

    /// Append one log entry for a run.
    async fn append_log(&self, run_id: &str, entry: TradeLogEntry) -> Result<()>;

    /// Fetch a run's log, optionally only entries at or after `since`.
    async fn get_logs(
        &self,
        run_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<TradeLogEntry>>;

    /// List all registered runs.
    async fn list_runs(&self) -> Result<Vec<RunMetadata>>;
}
