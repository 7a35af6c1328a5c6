//! Configuration Module
//!
//! Loads cache settings from environment variables and turns them into
//! [`CacheOptions`] for the composition root.

use std::env;

use tracing::warn;

use crate::cipher::CipherOptions;
use crate::key::{KeyConfigUpdate, DEFAULT_SEPARATOR};
use crate::module::{CacheOptions, CipherSource, StoreSource};
use crate::store::{RedisOptions, DEFAULT_REDIS_URL};

/// Which store the composition root should build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "redis" => Some(StoreBackend::Redis),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store to build
    pub store: StoreBackend,
    /// Redis connection URL
    pub redis_url: String,
    /// Separator placed between key segments
    pub key_separator: String,
    /// Optional namespace prepended to every key
    pub key_prefix: Option<String>,
    /// Hex-encoded 32-byte AES key for encrypted payloads
    pub encryption_key: Option<String>,
    /// Memory store cleanup interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_STORE` - `redis` or `memory` (default: redis)
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379)
    /// - `CACHE_KEY_SEPARATOR` - Key segment separator (default: ":")
    /// - `CACHE_KEY_PREFIX` - Key namespace (default: none)
    /// - `CACHE_ENCRYPTION_KEY` - 64 hex characters (default: random per process)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let store = match env::var("CACHE_STORE") {
            Ok(value) => StoreBackend::parse(&value).unwrap_or_else(|| {
                warn!(value = %value, "Unknown CACHE_STORE, using redis");
                defaults.store
            }),
            Err(_) => defaults.store,
        };

        Self {
            store,
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            key_separator: env::var("CACHE_KEY_SEPARATOR")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.key_separator),
            key_prefix: env::var("CACHE_KEY_PREFIX").ok().filter(|v| !v.is_empty()),
            encryption_key: env::var("CACHE_ENCRYPTION_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
            cleanup_interval: env::var("CACHE_CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
        }
    }

    // == Key Config ==
    /// Key settings as an update for the key builder.
    pub fn key_config(&self) -> KeyConfigUpdate {
        KeyConfigUpdate {
            separator: Some(self.key_separator.clone()),
            prefix: self.key_prefix.clone(),
        }
    }

    // == Cipher Options ==
    /// Cipher options from the configured key, or a random key if none is set.
    ///
    /// Values encrypted under a random key cannot be read by other processes.
    pub fn cipher_options(&self) -> CipherOptions {
        match &self.encryption_key {
            Some(key_hex) => CipherOptions::new(key_hex.clone()),
            None => {
                warn!("CACHE_ENCRYPTION_KEY not set, using a random per-process key");
                CipherOptions::random()
            }
        }
    }

    // == Into Options ==
    /// Options wiring the configured store and an AES-GCM cipher.
    pub fn into_options(self) -> CacheOptions {
        let store = match self.store {
            StoreBackend::Redis => StoreSource::Redis(RedisOptions {
                url: self.redis_url.clone(),
            }),
            StoreBackend::Memory => StoreSource::Memory {
                cleanup_interval: self.cleanup_interval,
            },
        };

        CacheOptions {
            cipher: CipherSource::Options(self.cipher_options()),
            key_config: Some(self.key_config()),
            store,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreBackend::Redis,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            key_separator: DEFAULT_SEPARATOR.to_string(),
            key_prefix: None,
            encryption_key: None,
            cleanup_interval: 1,
        }
    }
}
