//! Strategy registry - name-keyed strategy factories

use std::collections::HashMap;

use anyhow::Result;
use serde_json::Value;

use crate::strategy::implementations::{
    BollingerStrategy, EmaCrossStrategy, MacdStrategy, RsiStrategy,
};
use crate::strategy::Strategy;

pub type StrategyFactory = Box<dyn Fn(&Value) -> Result<Box<dyn Strategy>> + Send + Sync>;

/// Registry mapping strategy names to their factories.
///
/// Constructed once and passed by reference wherever strategies are created;
/// there is no global registry.
pub struct StrategyRegistry {
    factories: HashMap<String, StrategyFactory>,
}

impl StrategyRegistry {
    /// Create a registry pre-seeded with the built-in strategies.
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };

        registry.register("rsi", |params| {
            let period = params
                .get("period")
                .and_then(|v| v.as_u64())
                .unwrap_or(14) as usize;
            let oversold = params
                .get("oversold")
                .and_then(|v| v.as_f64())
                .unwrap_or(30.0);
            let overbought = params
                .get("overbought")
                .and_then(|v| v.as_f64())
                .unwrap_or(70.0);
            Ok(Box::new(RsiStrategy::new(period, oversold, overbought)?))
        });

        registry.register("macd", |params| {
            let fast = params.get("fast").and_then(|v| v.as_u64()).unwrap_or(12) as usize;
            let slow = params.get("slow").and_then(|v| v.as_u64()).unwrap_or(26) as usize;
            let signal = params.get("signal").and_then(|v| v.as_u64()).unwrap_or(9) as usize;
            Ok(Box::new(MacdStrategy::new(fast, slow, signal)?))
        });

        registry.register("bollinger", |params| {
            let period = params
                .get("period")
                .and_then(|v| v.as_u64())
                .unwrap_or(20) as usize;
            let std_dev = params
                .get("std_dev")
                .and_then(|v| v.as_f64())
                .unwrap_or(2.0);
            Ok(Box::new(BollingerStrategy::new(period, std_dev)?))
        });

        registry.register("ema_cross", |params| {
            let fast = params.get("fast").and_then(|v| v.as_u64()).unwrap_or(9) as usize;
            let slow = params.get("slow").and_then(|v| v.as_u64()).unwrap_or(21) as usize;
            Ok(Box::new(EmaCrossStrategy::new(fast, slow)?))
        });

        registry
    }

    /// Register a strategy factory under a name.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn Strategy>> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_lowercase(), Box::new(factory));
    }

    /// Create a strategy instance by name.
    pub fn create(&self, name: &str, params: &Value) -> Result<Box<dyn Strategy>> {
        let factory = self
            .factories
            .get(&name.to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("Unknown strategy type: {}", name))?;
        factory(params)
    }

    /// Get list of available strategy names
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Check if a strategy name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_lowercase())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtins_registered() {
        let registry = StrategyRegistry::new();
        for name in ["rsi", "macd", "bollinger", "ema_cross"] {
            assert!(registry.contains(name), "missing builtin: {}", name);
        }
        assert!(!registry.contains("martingale"));
    }

    #[test]
    fn test_create_with_params() {
        let registry = StrategyRegistry::new();
        let strategy = registry
            .create("RSI", &json!({"period": 7, "oversold": 25.0}))
            .unwrap();
        assert_eq!(strategy.name(), "rsi");
    }

    #[test]
    fn test_unknown_strategy_fails() {
        let registry = StrategyRegistry::new();
        assert!(registry.create("nope", &Value::Null).is_err());
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = StrategyRegistry::new();
        registry.register("rsi_tight", |_| {
            Ok(Box::new(
                crate::strategy::RsiStrategy::new(14, 40.0, 60.0).unwrap(),
            ))
        });
        assert!(registry.contains("rsi_tight"));
    }
}
