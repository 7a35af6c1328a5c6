//! Memory Store Module
//!
//! In-process store backed by a HashMap with TTL expiration. Expired entries
//! are invisible to reads and removed lazily or by the cleanup task.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use glob::Pattern;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::{current_timestamp_ms, BatchCommand, Store, StoredEntry, ACK_OK};

// == Memory Store ==
/// Shared in-memory key-value store.
///
/// Cloning is cheap and every clone sees the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoredEntry>>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = current_timestamp_ms();
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired_at(now)).count()
    }

    // == Is Empty ==
    /// Returns true if the store holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;

        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
            debug!(key, "memory store: dropped expired entry");
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String) -> Result<String> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry::new(value, None));
        Ok(ACK_OK.to_string())
    }

    async fn set_with_ttl(&self, key: &str, value: String, ttl_seconds: u64) -> Result<String> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry::new(value, Some(ttl_seconds)));
        Ok(ACK_OK.to_string())
    }

    async fn delete(&self, key: &str) -> Result<u64> {
        let mut entries = self.entries.write().await;
        match entries.remove(key) {
            Some(entry) if !entry.is_expired() => Ok(1),
            _ => Ok(0),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).is_some_and(|entry| !entry.is_expired()))
    }

    async fn list_keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let pattern = Pattern::new(&to_glob_pattern(pattern))
            .map_err(|e| CacheError::Store(format!("Invalid key pattern '{}': {}", pattern, e)))?;

        let now = current_timestamp_ms();
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired_at(now) && pattern.matches(key))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn execute_atomic_batch(&self, commands: Vec<BatchCommand>) -> Result<()> {
        // One guard for the whole batch: readers see all or none of it.
        let mut entries = self.entries.write().await;
        for command in commands {
            match command {
                BatchCommand::Del(key) => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }

    async fn flush_all(&self) -> Result<String> {
        self.entries.write().await.clear();
        Ok(ACK_OK.to_string())
    }
}

// == Pattern Translation ==
/// Rewrites a Redis `KEYS` pattern into `glob::Pattern` syntax.
///
/// Runs of `*` collapse to one (glob reserves `**` for path recursion),
/// `[^..]` becomes `[!..]`, and `\x` outside a class becomes the class `[x]`.
/// Inside a class the escaped character is kept literally; an escaped `]` is
/// moved to the front of the class, where glob reads it as a member.
fn to_glob_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    // (negated, members, has_close_bracket) of the class being read
    let mut class: Option<(bool, String, bool)> = None;

    while let Some(c) = chars.next() {
        if let Some((negated, members, has_bracket)) = class.as_mut() {
            match c {
                '\\' => match chars.next() {
                    Some(']') => *has_bracket = true,
                    Some(escaped) => members.push(escaped),
                    None => members.push('\\'),
                },
                ']' => {
                    out.push('[');
                    if *negated {
                        out.push('!');
                    }
                    if *has_bracket {
                        out.push(']');
                    }
                    out.push_str(members);
                    out.push(']');
                    class = None;
                }
                other => members.push(other),
            }
            continue;
        }

        match c {
            '\\' => match chars.next() {
                Some(escaped @ ('*' | '?' | '[' | ']')) => {
                    out.push('[');
                    out.push(escaped);
                    out.push(']');
                }
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            },
            '*' => {
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                out.push('*');
            }
            '[' => {
                let negated = chars.peek() == Some(&'^');
                if negated {
                    chars.next();
                }
                class = Some((negated, String::new(), false));
            }
            other => out.push(other),
        }
    }

    // Unterminated class: hand it to glob as written so it reports the error
    if let Some((negated, members, _)) = class {
        out.push('[');
        if negated {
            out.push('!');
        }
        out.push_str(&members);
    }

    out
}
