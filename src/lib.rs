//! Cache Facade - A key-value caching layer over Redis
//!
//! Provides namespaced key construction, optional payload encryption and
//! atomic pattern-based invalidation on top of a pluggable store.

pub mod cipher;
pub mod config;
pub mod error;
pub mod facade;
pub mod key;
pub mod module;
pub mod store;
pub mod tasks;

pub use cipher::{AesGcmCipher, Cipher, CipherOptions};
pub use config::{Config, StoreBackend};
pub use error::{CacheError, Result};
pub use facade::{CacheFacade, CachedValue, GetOptions, SetOptions};
pub use key::{KeyBuilder, KeyConfig, KeyConfigUpdate};
pub use module::{CacheModule, CacheOptions, CipherSource, StoreSource};
pub use store::{BatchCommand, MemoryStore, RedisOptions, RedisStore, Store};
pub use tasks::spawn_cleanup_task;
