//! Runtime registry - tracks the set of active runs

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::info;

use crate::error::EngineError;

/// How long `stop` waits for a run's task to observe the flag and exit.
const STOP_WAIT_SECS: u64 = 30;

/// Control handle for one spawned run task.
pub struct RunHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl RunHandle {
    pub fn new(stop_tx: watch::Sender<bool>, join: JoinHandle<()>) -> Self {
        Self { stop_tx, join }
    }

    /// Abort the task outright. Only used when registration fails after spawn.
    pub fn abort(&self) {
        let _ = self.stop_tx.send(true);
        self.join.abort();
    }
}

/// Map of run_id to run handle, guarded for concurrent access.
///
/// Stop is terminal: a stopped run's id moves to a tombstone set so a second
/// `stop` is a clean no-op while a never-registered id still reports
/// `RunNotFound`. Stopped ids cannot be reused.
pub struct RuntimeRegistry {
    runs: RwLock<HashMap<String, RunHandle>>,
    stopped: RwLock<HashSet<String>>,
}

impl RuntimeRegistry {
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
            stopped: RwLock::new(HashSet::new()),
        }
    }

    /// Whether a run id is known, running or already stopped.
    pub async fn is_known(&self, run_id: &str) -> bool {
        if self.runs.read().await.contains_key(run_id) {
            return true;
        }
        self.stopped.read().await.contains(run_id)
    }

    /// Register a running task under `run_id`. Fails on any reuse; a rejected
    /// handle is aborted so the losing task does not run unregistered.
    pub async fn add(&self, run_id: &str, handle: RunHandle) -> Result<(), EngineError> {
        if self.stopped.read().await.contains(run_id) {
            handle.abort();
            return Err(EngineError::RunAlreadyExists(run_id.to_string()));
        }
        let mut runs = self.runs.write().await;
        if runs.contains_key(run_id) {
            handle.abort();
            return Err(EngineError::RunAlreadyExists(run_id.to_string()));
        }
        runs.insert(run_id.to_string(), handle);
        Ok(())
    }

    /// Stop a run: signal its task, wait (bounded) for it to exit.
    ///
    /// The handle leaves the map and the id is tombstoned before the join, so
    /// the registry stays usable while a slow task winds down and a
    /// concurrent stop of the same id is a clean no-op. On `StopTimeout` both
    /// moves are rolled back so the caller can retry. The task may already
    /// have finished naturally (trade limit reached), in which case the join
    /// returns immediately. Stopping an id that never ran is `RunNotFound`.
    pub async fn stop(&self, run_id: &str) -> Result<(), EngineError> {
        if self.stopped.read().await.contains(run_id) {
            return Ok(());
        }

        let mut handle = {
            let mut runs = self.runs.write().await;
            runs.remove(run_id)
                .ok_or_else(|| EngineError::RunNotFound(run_id.to_string()))?
        };
        self.stopped.write().await.insert(run_id.to_string());
        let _ = handle.stop_tx.send(true);

        match timeout(Duration::from_secs(STOP_WAIT_SECS), &mut handle.join).await {
            Ok(_) => {
                info!(run_id, "run stopped and removed from registry");
                Ok(())
            }
            Err(_) => {
                self.stopped.write().await.remove(run_id);
                self.runs.write().await.insert(run_id.to_string(), handle);
                Err(EngineError::StopTimeout(run_id.to_string(), STOP_WAIT_SECS))
            }
        }
    }

    /// Ids of currently active runs.
    pub async fn list_active(&self) -> Vec<String> {
        self.runs.read().await.keys().cloned().collect()
    }
}

impl Default for RuntimeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_idle() -> RunHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let join = tokio::spawn(async move {
            let _ = stop_rx.changed().await;
        });
        RunHandle::new(stop_tx, join)
    }

    #[tokio::test]
    async fn test_add_stop_list() {
        let registry = RuntimeRegistry::new();
        registry.add("r1", spawn_idle()).await.unwrap();
        registry.add("r2", spawn_idle()).await.unwrap();
        assert_eq!(registry.list_active().await.len(), 2);

        registry.stop("r1").await.unwrap();
        assert_eq!(registry.list_active().await, vec!["r2".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_add_rejected() {
        let registry = RuntimeRegistry::new();
        registry.add("r1", spawn_idle()).await.unwrap();
        assert!(matches!(
            registry.add("r1", spawn_idle()).await,
            Err(EngineError::RunAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_but_unknown_errors() {
        let registry = RuntimeRegistry::new();
        registry.add("r1", spawn_idle()).await.unwrap();

        registry.stop("r1").await.unwrap();
        // Second stop: no-op, still success
        registry.stop("r1").await.unwrap();

        assert!(matches!(
            registry.stop("ghost").await,
            Err(EngineError::RunNotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_stop_does_not_block_registry() {
        let registry = std::sync::Arc::new(RuntimeRegistry::new());

        // Task that never observes the stop flag
        let (stuck_tx, stuck_rx) = watch::channel(false);
        let stuck_join = tokio::spawn(std::future::pending::<()>());
        registry
            .add("stuck", RunHandle::new(stuck_tx, stuck_join))
            .await
            .unwrap();
        registry.add("other", spawn_idle()).await.unwrap();

        let stopper = std::sync::Arc::clone(&registry);
        let stop_task = tokio::spawn(async move { stopper.stop("stuck").await });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        // The in-flight stop must not hold the map: list and stop still work
        assert!(registry.list_active().await.contains(&"other".to_string()));
        registry.stop("other").await.unwrap();

        tokio::time::advance(Duration::from_secs(STOP_WAIT_SECS + 1)).await;
        assert!(matches!(
            stop_task.await.unwrap(),
            Err(EngineError::StopTimeout(_, _))
        ));
        // Timed-out handle is back in the map so the stop can be retried
        assert!(registry.list_active().await.contains(&"stuck".to_string()));
        drop(stuck_rx);
    }

    #[tokio::test]
    async fn test_stopped_id_cannot_be_reused() {
        let registry = RuntimeRegistry::new();
        registry.add("r1", spawn_idle()).await.unwrap();
        registry.stop("r1").await.unwrap();
        assert!(registry.add("r1", spawn_idle()).await.is_err());
    }
}
