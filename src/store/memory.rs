//! In-memory metadata store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::store::{MetadataStore, RunMetadata, TradeLogEntry};
use crate::Result;

/// Map-backed store. The default collaborator for paper runs and tests; a
/// database-backed implementation slots in behind the same trait.
pub struct InMemoryStore {
    runs: RwLock<Vec<RunMetadata>>,
    logs: RwLock<HashMap<String, Vec<TradeLogEntry>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(Vec::new()),
            logs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataStore for InMemoryStore {
    async fn register_run(&self, metadata: RunMetadata) -> Result<()> {
        self.runs.write().await.push(metadata);
        Ok(())
    }

    async fn append_log(&self, run_id: &str, entry: TradeLogEntry) -> Result<()> {
        let mut logs = self.logs.write().await;
        logs.entry(run_id.to_string()).or_default().push(entry);
        Ok(())
    }

    async fn get_logs(
        &self,
        run_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<TradeLogEntry>> {
        let logs = self.logs.read().await;
        let entries = logs.get(run_id).cloned().unwrap_or_default();
        Ok(match since {
            Some(cutoff) => entries.into_iter().filter(|e| e.timestamp >= cutoff).collect(),
            None => entries,
        })
    }

    async fn list_runs(&self) -> Result<Vec<RunMetadata>> {
        Ok(self.runs.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Signal;

    fn entry(price: f64) -> TradeLogEntry {
        TradeLogEntry {
            timestamp: Utc::now(),
            price,
            action: Signal::Hold,
            order_id: None,
            quote_amount: None,
            status: "hold".to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_and_read_back() {
        let store = InMemoryStore::new();
        store.append_log("run-1", entry(100.0)).await.unwrap();
        store.append_log("run-1", entry(101.0)).await.unwrap();
        store.append_log("run-2", entry(50.0)).await.unwrap();

        let logs = store.get_logs("run-1", None).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].price, 101.0);

        let missing = store.get_logs("nope", None).await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_since_filter() {
        let store = InMemoryStore::new();
        let mut old = entry(1.0);
        old.timestamp = Utc::now() - chrono::Duration::hours(2);
        store.append_log("run-1", old).await.unwrap();
        store.append_log("run-1", entry(2.0)).await.unwrap();

        let cutoff = Utc::now() - chrono::Duration::hours(1);
        let recent = store.get_logs("run-1", Some(cutoff)).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].price, 2.0);
    }
}
