//! Run configuration

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// Configuration for a single live run.
///
/// `strategy` selects a factory from the [`StrategyRegistry`](crate::strategy::StrategyRegistry)
/// by name; `params` is the free-form parameter bag handed to that factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Caller-supplied run id; generated from the start timestamp when absent
    pub run_id: Option<String>,
    /// Strategy name (e.g., "rsi", "macd")
    pub strategy: String,
    /// Strategy parameters (free-form, strategy-specific)
    pub params: Value,
    /// Trading pair symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Bar interval (e.g., "1m", "5m", "1h")
    pub interval: String,
    /// Initial quote-asset capital
    pub capital: f64,
    /// Round-trip limit: the run stops once 2 x trades_limit actions executed
    pub trades_limit: u64,
    /// Window capacity fed to the strategy each tick
    pub dataset_size: usize,
    /// Accepted and recorded but not enforced as a stop condition
    pub min_capital: Option<f64>,
}

impl RunConfig {
    /// Create a config with defaults for everything but strategy and symbol.
    pub fn new(strategy: &str, symbol: &str) -> Self {
        Self {
            run_id: None,
            strategy: strategy.to_string(),
            params: Value::Null,
            symbol: symbol.to_string(),
            interval: "1m".to_string(),
            capital: 1_000.0,
            trades_limit: 10,
            dataset_size: 100,
            min_capital: None,
        }
    }

    /// Check the parameters a run cannot start without.
    ///
    /// Strategy-name resolution happens separately against the registry; this
    /// only covers the numeric/shape constraints.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.symbol.trim().is_empty() {
            return Err(EngineError::Config("symbol cannot be empty".to_string()));
        }
        if !(self.capital.is_finite() && self.capital > 0.0) {
            return Err(EngineError::Config(format!(
                "capital must be a positive number, got {}",
                self.capital
            )));
        }
        if self.trades_limit == 0 {
            return Err(EngineError::Config("trades_limit must be at least 1".to_string()));
        }
        if self.dataset_size < 2 {
            return Err(EngineError::Config(format!(
                "dataset_size must be at least 2, got {}",
                self.dataset_size
            )));
        }
        Ok(())
    }
}

/// Parse an interval string ("1m", "5m", "1h", "1d") to seconds.
///
/// Defaults to 60 seconds when the string cannot be parsed.
pub fn interval_to_seconds(interval: &str) -> u64 {
    let interval_lower = interval.to_lowercase();
    if interval_lower.ends_with('s') {
        if let Ok(secs) = interval_lower.trim_end_matches('s').parse::<u64>() {
            return secs;
        }
    } else if interval_lower.ends_with('m') {
        if let Ok(minutes) = interval_lower.trim_end_matches('m').parse::<u64>() {
            return minutes * 60;
        }
    } else if interval_lower.ends_with('h') {
        if let Ok(hours) = interval_lower.trim_end_matches('h').parse::<u64>() {
            return hours * 3600;
        }
    } else if interval_lower.ends_with('d') {
        if let Ok(days) = interval_lower.trim_end_matches('d').parse::<u64>() {
            return days * 86400;
        }
    }
    // Default to 1 minute if parsing fails
    60
}
