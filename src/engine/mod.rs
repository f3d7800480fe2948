//! Trading engine - control plane over live runs
//!
//! The [`TradingEngine`] is the single entry point callers use: it validates
//! configuration, instantiates strategies, warms up and spawns Tacticians, and
//! answers stop/list/evaluate requests against the runtime registry and the
//! metadata store.

pub mod registry;
pub mod tactician;

pub use registry::{RunHandle, RuntimeRegistry};
pub use tactician::{RunState, Tactician};

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::info;

use crate::backtest::{BacktestConfig, BacktestReport, Backtester};
use crate::config::RunConfig;
use crate::error::EngineError;
use crate::evaluate::{evaluate, EvaluationMetrics};
use crate::exchange::ExchangeGateway;
use crate::store::{MetadataStore, RunMetadata};
use crate::strategy::StrategyRegistry;

/// Facade over the run lifecycle: start, stop, list, evaluate, backtest.
pub struct TradingEngine {
    gateway: Arc<dyn ExchangeGateway>,
    store: Arc<dyn MetadataStore>,
    strategies: StrategyRegistry,
    runtime: RuntimeRegistry,
}

impl TradingEngine {
    /// Create an engine with the built-in strategy set.
    pub fn new(gateway: Arc<dyn ExchangeGateway>, store: Arc<dyn MetadataStore>) -> Self {
        Self::with_strategies(gateway, store, StrategyRegistry::new())
    }

    /// Create an engine with a caller-assembled strategy registry.
    pub fn with_strategies(
        gateway: Arc<dyn ExchangeGateway>,
        store: Arc<dyn MetadataStore>,
        strategies: StrategyRegistry,
    ) -> Self {
        Self {
            gateway,
            store,
            strategies,
            runtime: RuntimeRegistry::new(),
        }
    }

    /// Start a live run and return its id.
    ///
    /// Everything that can fail happens before the task is spawned: config
    /// validation, strategy construction, run-id collision checks, window
    /// warm-up and registration in the store. A failed start leaves no
    /// background task behind.
    pub async fn start(&self, config: RunConfig) -> Result<String, EngineError> {
        config.validate()?;

        let strategy = self
            .strategies
            .create(&config.strategy, &config.params)
            .map_err(|e| EngineError::Config(e.to_string()))?;

        let run_id = match &config.run_id {
            Some(id) => id.clone(),
            None => format!("{}-{}", config.strategy, Utc::now().timestamp_millis()),
        };
        if self.runtime.is_known(&run_id).await {
            return Err(EngineError::RunAlreadyExists(run_id));
        }

        let mut tactician = Tactician::new(
            run_id.clone(),
            config.clone(),
            strategy,
            Arc::clone(&self.gateway),
            Arc::clone(&self.store),
        );
        tactician
            .warm_up()
            .await
            .map_err(|e| EngineError::Gateway(e.to_string()))?;

        self.store
            .register_run(RunMetadata {
                run_id: run_id.clone(),
                symbol: config.symbol.clone(),
                initial_capital: config.capital,
                interval: config.interval.clone(),
                trades_limit: config.trades_limit,
                strategy_name: config.strategy.clone(),
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let join = tokio::spawn(tactician.run(stop_rx));
        let handle = RunHandle::new(stop_tx, join);

        // Two concurrent starts can race past is_known with the same id;
        // add() aborts the losing handle.
        self.runtime.add(&run_id, handle).await?;

        info!(run_id = %run_id, strategy = %config.strategy, "run started");
        Ok(run_id)
    }

    /// Stop a run, waiting (bounded) for its task to exit.
    pub async fn stop(&self, run_id: &str) -> Result<(), EngineError> {
        self.runtime.stop(run_id).await
    }

    /// Stop every active run. The first failure is surfaced after all stops
    /// have been attempted.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        let ids = self.runtime.list_active().await;
        let results =
            futures::future::join_all(ids.iter().map(|id| self.runtime.stop(id))).await;
        results.into_iter().collect()
    }

    /// Ids of runs whose tasks are still registered.
    pub async fn list_active(&self) -> Vec<String> {
        self.runtime.list_active().await
    }

    /// All runs ever registered, live or finished.
    pub async fn list_runs(&self) -> Result<Vec<RunMetadata>, EngineError> {
        self.store
            .list_runs()
            .await
            .map_err(|e| EngineError::Store(e.to_string()))
    }

    /// Recompute performance metrics for a run from its trade log.
    pub async fn evaluate_run(&self, run_id: &str) -> Result<EvaluationMetrics, EngineError> {
        let known = self
            .store
            .list_runs()
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?
            .iter()
            .any(|m| m.run_id == run_id);
        if !known {
            return Err(EngineError::RunNotFound(run_id.to_string()));
        }
        let logs = self
            .store
            .get_logs(run_id, None)
            .await
            .map_err(|e| EngineError::Store(e.to_string()))?;
        Ok(evaluate(&logs))
    }

    /// Replay a strategy over historical data without touching live state.
    pub async fn backtest(&self, config: BacktestConfig) -> crate::Result<BacktestReport> {
        let backtester = Backtester::new(Arc::clone(&self.gateway));
        backtester.run(&self.strategies, config).await
    }

    /// The strategy registry backing this engine.
    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }
}
