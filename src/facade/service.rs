//! Cache Facade Service
//!
//! Translates cache operations into store commands, applying JSON encoding and
//! optional encryption on the way in and out.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cipher::Cipher;
use crate::error::Result;
use crate::facade::{CachedValue, GetOptions, SetOptions};
use crate::store::{BatchCommand, Store};

// == Cache Facade ==
/// Uniform key-value interface over a [`Store`] and a [`Cipher`].
///
/// The facade keeps no state besides its two handles, so clones can be used
/// from any number of tasks. Store and cipher errors are returned as-is; there
/// is no retry at this layer.
///
/// Whether a value is encrypted is not recorded. A value written with
/// `encrypt` must be read with `decrypt`, otherwise the cipher text comes back
/// as [`CachedValue::Raw`].
#[derive(Clone)]
pub struct CacheFacade {
    store: Arc<dyn Store>,
    cipher: Arc<dyn Cipher>,
}

impl CacheFacade {
    // == Constructor ==
    pub fn new(store: Arc<dyn Store>, cipher: Arc<dyn Cipher>) -> Self {
        Self { store, cipher }
    }

    // == Get ==
    /// Reads `key`.
    ///
    /// Returns `None` when the key is absent. Present values are decrypted if
    /// requested, then parsed as JSON; non-JSON payloads come back as
    /// [`CachedValue::Raw`].
    pub async fn get(&self, key: &str, options: GetOptions) -> Result<Option<CachedValue>> {
        let Some(raw) = self.store.get(key).await? else {
            debug!(key, "cache miss");
            return Ok(None);
        };

        let payload = if options.decrypt {
            self.cipher.decrypt(&raw)?
        } else {
            raw
        };

        debug!(key, decrypt = options.decrypt, "cache hit");
        Ok(Some(CachedValue::parse(payload)))
    }

    /// Reads `key` and deserializes it into `T`.
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        key: &str,
        options: GetOptions,
    ) -> Result<Option<T>> {
        self.get(key, options)
            .await?
            .map(CachedValue::into_typed::<T>)
            .transpose()
    }

    // == Set ==
    /// Writes `data` under `key`, returning the store's acknowledgment.
    ///
    /// With `encrypt`, the cipher receives the JSON value itself rather than
    /// its serialized text, so a decrypting read parses it back unchanged.
    pub async fn set<T>(&self, key: &str, data: &T, options: SetOptions) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(data)?;

        let payload = if options.encrypt {
            self.cipher.encrypt(&value)?
        } else {
            serde_json::to_string(&value)?
        };

        debug!(key, ttl = ?options.ttl, encrypt = options.encrypt, "cache set");
        match options.ttl {
            Some(ttl) => self.store.set_with_ttl(key, payload, ttl).await,
            None => self.store.set(key, payload).await,
        }
    }

    // == Delete ==
    /// Removes `key`, returning 1 if it existed and 0 otherwise.
    pub async fn del(&self, key: &str) -> Result<u64> {
        self.store.delete(key).await
    }

    // == Exists ==
    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.store.exists(key).await
    }

    // == Keys ==
    /// Lists keys matching a glob-style pattern, unordered.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        self.store.list_keys_matching(pattern).await
    }

    // == Delete All Matching ==
    /// Deletes every key matching any of `patterns` in one atomic batch.
    ///
    /// All patterns are expanded before anything is deleted. When nothing
    /// matches, the store is not asked to delete anything.
    pub async fn delete_all_matching<I, S>(&self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut commands = Vec::new();

        for pattern in patterns {
            let matched = self.keys(pattern.as_ref()).await?;
            if matched.is_empty() {
                continue;
            }
            commands.extend(matched.into_iter().map(BatchCommand::Del));
        }

        if commands.is_empty() {
            debug!("delete_all_matching: no keys matched");
            return Ok(());
        }

        debug!(keys = commands.len(), "delete_all_matching: issuing atomic batch");
        self.store.execute_atomic_batch(commands).await
    }

    // == Flush All ==
    /// Clears the entire store. Irreversible.
    pub async fn flush_all(&self) -> Result<String> {
        self.store.flush_all().await
    }
}

impl fmt::Debug for CacheFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheFacade").finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{AesGcmCipher, KEY_LENGTH};
    use crate::error::CacheError;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn facade() -> (CacheFacade, MemoryStore) {
        let store = MemoryStore::new();
        let facade = CacheFacade::new(
            Arc::new(store.clone()),
            Arc::new(AesGcmCipher::new([1u8; KEY_LENGTH])),
        );
        (facade, store)
    }

    #[tokio::test]
    async fn test_set_stores_json_text() {
        let (cache, store) = facade();

        let ack = cache
            .set("user:1", &json!({"name": "ada"}), SetOptions::default())
            .await
            .unwrap();

        assert_eq!(ack, "OK");
        assert_eq!(
            store.get("user:1").await.unwrap().as_deref(),
            Some(r#"{"name":"ada"}"#)
        );
    }

    #[tokio::test]
    async fn test_get_absent_is_none() {
        let (cache, _) = facade();
        assert!(cache.get("missing", GetOptions::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_non_json_is_raw() {
        let (cache, store) = facade();
        store.set("token", "abc.def.ghi".to_string()).await.unwrap();

        let value = cache.get("token", GetOptions::default()).await.unwrap();
        assert_eq!(value, Some(CachedValue::Raw("abc.def.ghi".to_string())));
    }

    #[tokio::test]
    async fn test_encrypted_payload_is_not_plaintext() {
        let (cache, store) = facade();
        cache
            .set("secret", &"hunter2", SetOptions::default().encrypted())
            .await
            .unwrap();

        let raw = store.get("secret").await.unwrap().unwrap();
        assert!(!raw.contains("hunter2"));

        let value = cache.get("secret", GetOptions::decrypted()).await.unwrap();
        assert_eq!(value, Some(CachedValue::Parsed(json!("hunter2"))));
    }

    #[tokio::test]
    async fn test_decrypting_plain_value_fails() {
        let (cache, _) = facade();
        cache.set("plain", &"visible", SetOptions::default()).await.unwrap();

        let result = cache.get("plain", GetOptions::decrypted()).await;
        assert!(matches!(result, Err(CacheError::Cipher(_))));
    }

    #[tokio::test]
    async fn test_get_as_typed() {
        let (cache, _) = facade();
        cache.set("nums", &vec![1, 2, 3], SetOptions::default()).await.unwrap();

        let nums: Option<Vec<u32>> = cache.get_as("nums", GetOptions::default()).await.unwrap();
        assert_eq!(nums, Some(vec![1, 2, 3]));

        let missing: Option<Vec<u32>> = cache.get_as("none", GetOptions::default()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_del_and_exists() {
        let (cache, _) = facade();
        cache.set("k", &1, SetOptions::default()).await.unwrap();

        assert!(cache.exists("k").await.unwrap());
        assert_eq!(cache.del("k").await.unwrap(), 1);
        assert_eq!(cache.del("k").await.unwrap(), 0);
        assert!(!cache.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_all_matching_across_patterns() {
        let (cache, _) = facade();
        for key in ["user:1", "user:2", "order:1", "cart:9"] {
            cache.set(key, &key, SetOptions::default()).await.unwrap();
        }

        cache
            .delete_all_matching(["user:*", "order:*", "nothing:*"])
            .await
            .unwrap();

        assert_eq!(cache.keys("*").await.unwrap(), vec!["cart:9"]);
    }
}
