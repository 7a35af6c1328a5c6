//! Cipher Module
//!
//! Symmetric encryption applied to sensitive cached payloads.

mod aes;

use serde_json::Value;

use crate::error::Result;

pub use aes::{AesGcmCipher, CipherOptions, KEY_LENGTH};

// == Cipher Trait ==
/// Symmetric encryption capability.
///
/// `decrypt` must return exactly the JSON text of the value handed to
/// `encrypt`. Malformed or tampered input is an error, never garbage output.
pub trait Cipher: Send + Sync {
    /// Serializes `value` to JSON and encrypts it.
    fn encrypt(&self, value: &Value) -> Result<String>;

    /// Decrypts `ciphertext` back to the JSON plaintext.
    fn decrypt(&self, ciphertext: &str) -> Result<String>;
}
