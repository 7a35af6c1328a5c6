//! Per-call options for reads and writes.

use serde::{Deserialize, Serialize};

/// Options for [`CacheFacade::get`](crate::facade::CacheFacade::get).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOptions {
    /// Pass the raw value through the cipher before parsing
    #[serde(default)]
    pub decrypt: bool,
}

impl GetOptions {
    /// Options for reading a value written with `encrypt`.
    pub fn decrypted() -> Self {
        Self { decrypt: true }
    }
}

/// Options for [`CacheFacade::set`](crate::facade::CacheFacade::set).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOptions {
    /// Expiry in seconds; `None` stores without expiry
    #[serde(default)]
    pub ttl: Option<u64>,
    /// Store cipher text instead of plain JSON
    #[serde(default)]
    pub encrypt: bool,
}

impl SetOptions {
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.ttl = Some(seconds);
        self
    }

    pub fn encrypted(mut self) -> Self {
        self.encrypt = true;
        self
    }
}
