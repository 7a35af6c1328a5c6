//! TTL Cleanup Task
//!
//! Background task that periodically removes expired entries from a
//! [`MemoryStore`]. Reads already hide expired entries; the sweep only bounds
//! memory held by keys nobody reads again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns a background task that periodically sweeps expired entries.
///
/// # Arguments
/// * `store` - Memory store to sweep (clones share entries)
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task; abort it on shutdown.
///
/// # Example
/// ```ignore
/// let store = MemoryStore::new();
/// let cleanup_handle = spawn_cleanup_task(store.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: MemoryStore, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let store = MemoryStore::new();
        store
            .set_with_ttl("expire_soon", "value".to_string(), 1)
            .await
            .unwrap();
        store.set("keep", "value".to_string()).await.unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        // Wait for entry to expire and cleanup to run
        tokio::time::sleep(Duration::from_millis(2500)).await;

        // Swept entries are gone from the map, not just hidden
        assert_eq!(store.cleanup_expired().await, 0);
        assert_eq!(store.len().await, 1);
        assert!(store.exists("keep").await.unwrap());

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let store = MemoryStore::new();
        store
            .set_with_ttl("long_lived", "value".to_string(), 3600)
            .await
            .unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(
            store.get("long_lived").await.unwrap().as_deref(),
            Some("value")
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let handle = spawn_cleanup_task(MemoryStore::new(), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
