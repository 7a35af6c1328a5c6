//! AES-GCM Cipher Module
//!
//! AES-256-GCM with a fresh random nonce per message. The stored envelope is
//! `base64(nonce || ciphertext)`.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cipher::Cipher;
use crate::error::{CacheError, Result};

// == Public Constants ==
/// Required key length in bytes
pub const KEY_LENGTH: usize = 32;

/// Nonce length in bytes
pub const NONCE_LENGTH: usize = 12;

// == Cipher Options ==
/// Parameters for constructing an [`AesGcmCipher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherOptions {
    /// 32-byte key as 64 hex characters
    pub key_hex: String,
}

impl CipherOptions {
    pub fn new(key_hex: impl Into<String>) -> Self {
        Self {
            key_hex: key_hex.into(),
        }
    }

    /// Options holding a freshly generated random key.
    pub fn random() -> Self {
        let mut key = [0u8; KEY_LENGTH];
        rand::thread_rng().fill_bytes(&mut key);
        Self::new(hex::encode(key))
    }
}

// == AES-GCM Cipher ==
/// AES-256-GCM implementation of [`Cipher`].
#[derive(Clone)]
pub struct AesGcmCipher {
    cipher: Aes256Gcm,
}

impl AesGcmCipher {
    // == Constructors ==
    /// Creates a cipher from raw key bytes.
    pub fn new(key: [u8; KEY_LENGTH]) -> Self {
        Self {
            cipher: Aes256Gcm::new(&key.into()),
        }
    }

    /// Creates a cipher from hex-encoded options.
    pub fn from_options(options: &CipherOptions) -> Result<Self> {
        let bytes = hex::decode(options.key_hex.trim())
            .map_err(|e| CacheError::Config(format!("Encryption key is not valid hex: {}", e)))?;

        let key: [u8; KEY_LENGTH] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            CacheError::Config(format!(
                "Encryption key must be {} bytes, got {}",
                KEY_LENGTH,
                bytes.len()
            ))
        })?;

        Ok(Self::new(key))
    }
}

impl Cipher for AesGcmCipher {
    fn encrypt(&self, value: &Value) -> Result<String> {
        let plaintext = serde_json::to_string(value)?;

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| CacheError::Cipher(format!("Encryption failed: {}", e)))?;

        let mut envelope = nonce_bytes.to_vec();
        envelope.extend_from_slice(&ciphertext);

        Ok(general_purpose::STANDARD.encode(envelope))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let envelope = general_purpose::STANDARD
            .decode(ciphertext)
            .map_err(|e| CacheError::Cipher(format!("Ciphertext is not valid base64: {}", e)))?;

        if envelope.len() < NONCE_LENGTH {
            return Err(CacheError::Cipher(
                "Ciphertext too short to contain a nonce".to_string(),
            ));
        }

        let (nonce_bytes, sealed) = envelope.split_at(NONCE_LENGTH);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|e| CacheError::Cipher(format!("Decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| CacheError::Cipher(format!("Decrypted payload is not UTF-8: {}", e)))
    }
}
