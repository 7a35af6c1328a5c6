//! Error types for the cache facade
//!
//! Provides unified error handling using thiserror. Store and cipher failures
//! keep their source so callers can decide on retry policy themselves.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache facade.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The Redis backend rejected or failed a command
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A non-Redis store backend failed
    #[error("Store error: {0}")]
    Store(String),

    /// Encryption or decryption failed
    #[error("Cipher error: {0}")]
    Cipher(String),

    /// A value could not be converted to or from JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid options supplied at composition time
    #[error("Configuration error: {0}")]
    Config(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache facade.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error_converts() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let cache_err: CacheError = err.into();
        assert!(matches!(cache_err, CacheError::Serialization(_)));
    }

    #[test]
    fn test_error_display_keeps_message() {
        let err = CacheError::Cipher("authentication failed".to_string());
        assert_eq!(err.to_string(), "Cipher error: authentication failed");
    }
}
