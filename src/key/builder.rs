//! Key Builder Module
//!
//! Joins key segments under an optional prefix and hashes variable inputs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::key::{DEFAULT_HASH_LENGTH, DEFAULT_SEPARATOR};

// == Key Config ==
/// Settings applied to every key a [`KeyBuilder`] produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Placed between segments; must be non-empty
    pub separator: String,
    /// Namespace prepended as the first segment when set
    pub prefix: Option<String>,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            prefix: None,
        }
    }
}

// == Key Config Update ==
/// Partial configuration merged by [`KeyBuilder::configure`].
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfigUpdate {
    pub separator: Option<String>,
    pub prefix: Option<String>,
}

impl KeyConfigUpdate {
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Removes a previously configured prefix.
    pub fn clear_prefix(mut self) -> Self {
        self.prefix = Some(String::new());
        self
    }
}

// == Key Builder ==
/// Builds cache keys from ordered segments.
///
/// The builder owns its configuration. It is created once at startup and
/// handed to whoever needs keys; changing the configuration only affects keys
/// built afterwards.
#[derive(Debug, Clone, Default)]
pub struct KeyBuilder {
    config: KeyConfig,
}

impl KeyBuilder {
    // == Constructor ==
    /// Creates a builder with the given configuration.
    pub fn new(config: KeyConfig) -> Self {
        Self { config }
    }

    // == Configure ==
    /// Merges `update` into the current configuration. Last write wins.
    ///
    /// A `None` field leaves the current value alone. An empty prefix clears
    /// it (see [`KeyConfigUpdate::clear_prefix`]).
    pub fn configure(&mut self, update: KeyConfigUpdate) {
        if let Some(separator) = update.separator {
            self.config.separator = separator;
        }
        if let Some(prefix) = update.prefix {
            self.config.prefix = Some(prefix).filter(|p| !p.is_empty());
        }
    }

    // == Current Config ==
    /// Returns a copy of the active configuration.
    pub fn current_config(&self) -> KeyConfig {
        self.config.clone()
    }

    // == Build ==
    /// Joins the prefix (if any) and `segments` with the separator.
    ///
    /// An empty prefix is treated as unset. With no prefix and no segments the
    /// result is the empty string.
    pub fn build<I, S>(&self, segments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parts: Vec<String> = Vec::new();

        if let Some(prefix) = self.config.prefix.as_deref().filter(|p| !p.is_empty()) {
            parts.push(prefix.to_string());
        }
        parts.extend(segments.into_iter().map(|s| s.as_ref().to_string()));

        parts.join(&self.config.separator)
    }

    // == Hash ==
    /// Returns the first `length` lowercase hex characters of the SHA-256
    /// digest of `data`.
    ///
    /// The output is a fixed prefix of the full digest, so it never changes
    /// between runs. Lengths above 64 return the whole digest.
    pub fn hash(data: &str, length: usize) -> String {
        let mut digest = hex::encode(Sha256::digest(data.as_bytes()));
        digest.truncate(length);
        digest
    }

    /// [`KeyBuilder::hash`] with the default length of 16.
    pub fn short_hash(data: &str) -> String {
        Self::hash(data, DEFAULT_HASH_LENGTH)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_prefix() {
        let keys = KeyBuilder::default();
        assert_eq!(keys.build(["user", "42", "profile"]), "user:42:profile");
    }

    #[test]
    fn test_build_with_prefix() {
        let keys = KeyBuilder::new(KeyConfig {
            separator: ":".to_string(),
            prefix: Some("app".to_string()),
        });
        assert_eq!(keys.build(["user", "42"]), "app:user:42");
    }

    #[test]
    fn test_build_empty_segments() {
        let keys = KeyBuilder::default();
        assert_eq!(keys.build(Vec::<String>::new()), "");
    }

    #[test]
    fn test_build_only_prefix() {
        let keys = KeyBuilder::new(KeyConfig {
            separator: "/".to_string(),
            prefix: Some("ns".to_string()),
        });
        assert_eq!(keys.build(Vec::<&str>::new()), "ns");
    }

    #[test]
    fn test_empty_prefix_is_ignored() {
        let keys = KeyBuilder::new(KeyConfig {
            separator: ":".to_string(),
            prefix: Some(String::new()),
        });
        assert_eq!(keys.build(["a", "b"]), "a:b");
    }

    #[test]
    fn test_configure_merges_fields() {
        let mut keys = KeyBuilder::default();
        keys.configure(KeyConfigUpdate::default().prefix("svc"));
        assert_eq!(keys.current_config().separator, ":");
        assert_eq!(keys.current_config().prefix.as_deref(), Some("svc"));

        keys.configure(KeyConfigUpdate::default().separator("|"));
        assert_eq!(keys.current_config().prefix.as_deref(), Some("svc"));
        assert_eq!(keys.build(["x"]), "svc|x");
    }

    #[test]
    fn test_configure_clears_prefix() {
        let mut keys = KeyBuilder::default();
        keys.configure(KeyConfigUpdate::default().prefix("svc"));
        assert_eq!(keys.build(["a"]), "svc:a");

        keys.configure(KeyConfigUpdate::default().clear_prefix());
        assert!(keys.current_config().prefix.is_none());
        assert_eq!(keys.build(["a"]), "a");
    }

    #[test]
    fn test_current_config_is_a_copy() {
        let keys = KeyBuilder::default();
        let mut copy = keys.current_config();
        copy.separator = "#".to_string();
        assert_eq!(keys.current_config().separator, ":");
    }

    #[test]
    fn test_hash_known_digest() {
        // sha256("hello")
        assert_eq!(KeyBuilder::short_hash("hello"), "2cf24dba5fb0a30e");
        assert_eq!(KeyBuilder::hash("hello", 8), "2cf24dba");
    }

    #[test]
    fn test_hash_length_over_digest() {
        assert_eq!(KeyBuilder::hash("hello", 200).len(), 64);
    }

    #[test]
    fn test_hash_zero_length() {
        assert_eq!(KeyBuilder::hash("hello", 0), "");
    }
}
