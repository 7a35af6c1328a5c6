//! Store Module
//!
//! The key-value capability the facade writes through, and its backends.
//!
//! # Backends
//! - [`RedisStore`] - remote Redis server via a connection manager
//! - [`MemoryStore`] - in-process map with TTL, for tests and local runs

mod entry;
mod memory;
mod redis_backend;

use async_trait::async_trait;

use crate::error::Result;

pub use entry::{current_timestamp_ms, StoredEntry};
pub use memory::MemoryStore;
pub use redis_backend::{RedisOptions, RedisStore, DEFAULT_REDIS_URL};

// == Public Constants ==
/// Acknowledgment returned by successful writes and flushes
pub const ACK_OK: &str = "OK";

// == Batch Command ==
/// A single command inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchCommand {
    /// Remove a key
    Del(String),
}

// == Store Trait ==
/// Remote key-value store capability.
///
/// `get` reports a missing key as `None`, which is distinct from a stored
/// empty string. Implementations own connection handling, timeouts and
/// retries.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetches the raw value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` with no expiry.
    async fn set(&self, key: &str, value: String) -> Result<String>;

    /// Writes `value` expiring after `ttl_seconds`.
    async fn set_with_ttl(&self, key: &str, value: String, ttl_seconds: u64) -> Result<String>;

    /// Removes `key`, returning how many keys were removed.
    async fn delete(&self, key: &str) -> Result<u64>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Lists keys matching a glob-style pattern, in no particular order.
    async fn list_keys_matching(&self, pattern: &str) -> Result<Vec<String>>;

    /// Applies every command with no observable partial state.
    async fn execute_atomic_batch(&self, commands: Vec<BatchCommand>) -> Result<()>;

    /// Clears every key in the store.
    async fn flush_all(&self) -> Result<String>;
}
