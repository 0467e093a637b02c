//! Web Storage
//!
//! Origin-scoped key/value strings, the `localStorage` the page scripts read
//! their state from. Per-origin quota: 5 MB (keys + values combined).

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

// ── Constants ───────────────────────────────────────────────

/// Maximum storage per origin (5 MB).
const MAX_STORAGE_SIZE: usize = 5 * 1024 * 1024;

// ── Types ───────────────────────────────────────────────────

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key + value would exceed the 5 MB quota.
    #[error("QuotaExceededError")]
    QuotaExceeded,
    /// Value could not be encoded as JSON.
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value store for one origin.
#[derive(Debug, Clone, Default)]
pub struct WebStorage {
    /// Origin this storage belongs to.
    origin: String,
    /// Key → Value store.
    data: BTreeMap<String, String>,
    /// Current total size (keys + values in bytes).
    current_size: usize,
}

// ── Implementation ──────────────────────────────────────────

impl WebStorage {
    /// Create a new empty storage.
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            ..Self::default()
        }
    }

    /// Get an item by key.
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|s| s.as_str())
    }

    /// Set an item.  Returns `QuotaExceeded` if the quota would be exceeded.
    pub fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let old_entry_size = self
            .data
            .get(key)
            .map(|v| key.len() + v.len())
            .unwrap_or(0);
        let projected = self.current_size - old_entry_size + key.len() + value.len();

        if projected > MAX_STORAGE_SIZE {
            return Err(StorageError::QuotaExceeded);
        }

        self.data.insert(key.to_string(), value.to_string());
        self.current_size = projected;
        Ok(())
    }

    /// Remove an item.
    pub fn remove_item(&mut self, key: &str) {
        if let Some(value) = self.data.remove(key) {
            self.current_size = self.current_size.saturating_sub(key.len() + value.len());
        }
    }

    /// Clear all items.
    pub fn clear(&mut self) {
        self.data.clear();
        self.current_size = 0;
    }

    /// Get the key at the given index (sorted key order).
    pub fn key(&self, index: usize) -> Option<&str> {
        self.data.keys().nth(index).map(|s| s.as_str())
    }

    /// Number of items.
    pub fn length(&self) -> usize {
        self.data.len()
    }

    /// Current byte usage.
    pub fn size(&self) -> usize {
        self.current_size
    }

    /// Origin string.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Read and decode a JSON item.
    ///
    /// Missing keys and values that do not decode as `T` both yield `None`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_item(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::debug!("[FoodFest Pages] ignoring malformed {:?}: {}", key, err);
                None
            }
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw)
    }
}
