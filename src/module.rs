//! Module Wiring
//!
//! Composition root: resolves the store and cipher capabilities once, either by
//! reusing instances the caller already built or by constructing them from
//! options, and hands back a ready facade plus its key builder.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cipher::{AesGcmCipher, Cipher, CipherOptions};
use crate::error::Result;
use crate::facade::CacheFacade;
use crate::key::{KeyBuilder, KeyConfigUpdate};
use crate::store::{MemoryStore, RedisOptions, RedisStore, Store};
use crate::tasks::spawn_cleanup_task;

// == Store Source ==
/// Where the store capability comes from.
#[derive(Clone)]
pub enum StoreSource {
    /// Use an already constructed store as-is
    Instance(Arc<dyn Store>),
    /// Connect a new Redis store
    Redis(RedisOptions),
    /// Create a fresh in-process store swept every `cleanup_interval` seconds
    Memory { cleanup_interval: u64 },
}

impl StoreSource {
    fn describe(&self) -> &'static str {
        match self {
            StoreSource::Instance(_) => "instance",
            StoreSource::Redis(_) => "redis",
            StoreSource::Memory { .. } => "memory",
        }
    }
}

/// A resolved store, plus the sweeper when the module owns a memory store.
struct ResolvedStore {
    store: Arc<dyn Store>,
    memory: Option<MemoryStore>,
    sweeper: Option<JoinHandle<()>>,
}

impl ResolvedStore {
    async fn resolve(source: StoreSource) -> Result<Self> {
        match source {
            StoreSource::Instance(store) => Ok(Self {
                store,
                memory: None,
                sweeper: None,
            }),
            StoreSource::Redis(options) => Ok(Self {
                store: Arc::new(RedisStore::connect(&options).await?),
                memory: None,
                sweeper: None,
            }),
            StoreSource::Memory { cleanup_interval } => {
                let memory = MemoryStore::new();
                let sweeper = spawn_cleanup_task(memory.clone(), cleanup_interval);
                Ok(Self {
                    store: Arc::new(memory.clone()),
                    memory: Some(memory),
                    sweeper: Some(sweeper),
                })
            }
        }
    }
}

// == Cipher Source ==
/// Where the cipher capability comes from.
#[derive(Clone)]
pub enum CipherSource {
    /// Use an already constructed cipher as-is
    Instance(Arc<dyn Cipher>),
    /// Build an AES-GCM cipher from options
    Options(CipherOptions),
}

impl CipherSource {
    fn resolve(self) -> Result<Arc<dyn Cipher>> {
        match self {
            CipherSource::Instance(cipher) => Ok(cipher),
            CipherSource::Options(options) => Ok(Arc::new(AesGcmCipher::from_options(&options)?)),
        }
    }
}

// == Cache Options ==
/// Everything needed to wire a [`CacheModule`].
#[derive(Clone)]
pub struct CacheOptions {
    pub store: StoreSource,
    pub cipher: CipherSource,
    /// Applied on top of the default key configuration
    pub key_config: Option<KeyConfigUpdate>,
}

// == Cache Module ==
/// A wired facade and the key builder configured alongside it.
///
/// When the module created its own memory store it also owns that store's
/// TTL sweeper, which is aborted when the module is dropped.
pub struct CacheModule {
    facade: CacheFacade,
    keys: KeyBuilder,
    memory: Option<MemoryStore>,
    sweeper: Option<JoinHandle<()>>,
}

impl CacheModule {
    // == Register ==
    /// Resolves both capabilities and builds the facade.
    pub async fn register(options: CacheOptions) -> Result<Self> {
        let mut keys = KeyBuilder::default();
        if let Some(update) = options.key_config {
            keys.configure(update);
        }

        let store_kind = options.store.describe();
        let cipher = options.cipher.resolve()?;
        let resolved = ResolvedStore::resolve(options.store).await?;

        info!(
            store = store_kind,
            sweeper = resolved.sweeper.is_some(),
            "Cache module registered"
        );
        Ok(Self {
            facade: CacheFacade::new(resolved.store, cipher),
            keys,
            memory: resolved.memory,
            sweeper: resolved.sweeper,
        })
    }

    // == Register Async ==
    /// Awaits `factory` for the options, then wires them like
    /// [`CacheModule::register`].
    pub async fn register_async<F, Fut>(factory: F) -> Result<Self>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CacheOptions>>,
    {
        let options = factory().await?;
        Self::register(options).await
    }

    pub fn facade(&self) -> &CacheFacade {
        &self.facade
    }

    pub fn keys(&self) -> &KeyBuilder {
        &self.keys
    }

    /// The memory store created by [`StoreSource::Memory`], if any.
    pub fn memory_store(&self) -> Option<&MemoryStore> {
        self.memory.as_ref()
    }
}

impl Drop for CacheModule {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

impl fmt::Debug for CacheModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheModule")
            .field("keys", &self.keys)
            .field("sweeper", &self.sweeper.is_some())
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::KEY_LENGTH;
    use crate::error::CacheError;
    use crate::facade::{GetOptions, SetOptions};
    use std::time::Duration;

    fn memory_options() -> CacheOptions {
        CacheOptions {
            store: StoreSource::Memory { cleanup_interval: 1 },
            cipher: CipherSource::Options(CipherOptions::random()),
            key_config: None,
        }
    }

    #[tokio::test]
    async fn test_register_from_options() {
        let module = CacheModule::register(memory_options()).await.unwrap();

        module
            .facade()
            .set("k", &"v", SetOptions::default().encrypted())
            .await
            .unwrap();
        let value = module.facade().get("k", GetOptions::decrypted()).await.unwrap();
        assert!(value.is_some());
        assert_eq!(module.keys().build(["a", "b"]), "a:b");
    }

    #[tokio::test]
    async fn test_register_reuses_instances() {
        let store = MemoryStore::new();
        let cipher: Arc<dyn Cipher> = Arc::new(AesGcmCipher::new([3u8; KEY_LENGTH]));

        let module = CacheModule::register(CacheOptions {
            store: StoreSource::Instance(Arc::new(store.clone())),
            cipher: CipherSource::Instance(cipher),
            key_config: Some(KeyConfigUpdate::default().prefix("app")),
        })
        .await
        .unwrap();

        let key = module.keys().build(["user", "1"]);
        assert_eq!(key, "app:user:1");

        module.facade().set(&key, &1, SetOptions::default()).await.unwrap();
        assert!(store.exists("app:user:1").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_async_wires_options() {
        let module = CacheModule::register_async(|| async {
            let mut options = memory_options();
            options.key_config = Some(KeyConfigUpdate::default().separator("/"));
            Ok(options)
        })
        .await
        .unwrap();

        let key = module.keys().build(["a", "b"]);
        assert_eq!(key, "a/b");

        let facade = module.facade();
        facade
            .set(&key, &"secret", SetOptions::default().encrypted())
            .await
            .unwrap();
        assert!(facade.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_register_async_propagates_factory_error() {
        let result = CacheModule::register_async(|| async {
            Err(CacheError::Config("no settings".to_string()))
        })
        .await;
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_cipher_options() {
        let mut options = memory_options();
        options.cipher = CipherSource::Options(CipherOptions::new("not-hex"));

        let result = CacheModule::register(options).await;
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[tokio::test]
    async fn test_register_memory_starts_sweeper() {
        let module = CacheModule::register(memory_options()).await.unwrap();
        module
            .facade()
            .set("short", &"lived", SetOptions::default().ttl(1))
            .await
            .unwrap();
        module.facade().set("keep", &1, SetOptions::default()).await.unwrap();

        // Wait for the entry to expire and a sweep to run
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let store = module.memory_store().unwrap();
        assert_eq!(store.cleanup_expired().await, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_instance_has_no_sweeper() {
        let mut options = memory_options();
        options.store = StoreSource::Instance(Arc::new(MemoryStore::new()));

        let module = CacheModule::register(options).await.unwrap();
        assert!(module.memory_store().is_none());
        assert!(module.sweeper.is_none());
    }
}
