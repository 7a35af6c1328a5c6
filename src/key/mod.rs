//! Key Module
//!
//! Deterministic, namespaced cache key construction and stable short hashes.

mod builder;


pub use builder::{KeyBuilder, KeyConfig, KeyConfigUpdate};

// == Public Constants ==
/// Separator used when none is configured
pub const DEFAULT_SEPARATOR: &str = ":";

/// Default length of a truncated key hash
pub const DEFAULT_HASH_LENGTH: usize = 16;
