//! The [`Store`] facade: JSON values with optional expiry.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::backend::{MemoryBackend, StorageBackend};
use crate::clock::{Clock, SystemClock, duration_millis};
use crate::error::StoreError;

/// Nominal capacity reported by [`Store::usage`].
pub const NOMINAL_CAPACITY: usize = 5 * 1024 * 1024;

const EXPIRE_AT: &str = "expireAt";
const LEGACY_EXPIRE_AT: &str = "expireTime";

/// Result of [`Store::lookup`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Missing,
    /// The entry had lapsed and has been removed.
    Expired,
    Present(T),
}

impl<T> Lookup<T> {
    pub fn present(self) -> Option<T> {
        match self {
            Lookup::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Lookup::Expired)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageUsage {
    pub used: usize,
    pub available: usize,
    /// Share of `available` in use, capped at 100.
    pub percentage: f64,
}

/// Key-value store over a [`StorageBackend`].
///
/// No operation returns an error. Backend failures are logged and the
/// operation degrades to a no-op or to the caller's default.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Store {
    pub fn new(backend: Arc<dyn StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()), Arc::new(SystemClock))
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Writes `value`, wrapped with an expiry timestamp when `ttl` is given.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(source) => {
                log_failure(
                    "set",
                    &StoreError::Serialize {
                        key: key.to_string(),
                        source,
                    },
                );
                return;
            }
        };
        let stored = match ttl {
            Some(ttl) => {
                let mut wrapper = Map::new();
                wrapper.insert("value".to_string(), value);
                wrapper.insert(
                    EXPIRE_AT.to_string(),
                    Value::from(self.clock.now_millis().saturating_add(duration_millis(ttl))),
                );
                Value::Object(wrapper)
            }
            None => value,
        };
        if let Err(e) = self.backend.write(key, &stored.to_string()) {
            log_failure("set", &e);
        }
    }

    /// Reads `key`, returning `default` when it is missing, expired or not
    /// convertible to `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.lookup(key).present().unwrap_or(default)
    }

    /// Reads `key` and reports whether it was missing, expired or present.
    ///
    /// Expired entries are deleted. A present entry that does not convert to
    /// `T` is reported as missing.
    pub fn lookup<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        let Some(raw) = self.get_raw(key) else {
            return Lookup::Missing;
        };
        let value = match unwrap_expiring(raw) {
            Unwrapped::Plain(value) => value,
            Unwrapped::Expiring { value, expire_at } => {
                if self.clock.now_millis() > expire_at {
                    tracing::debug!(key, "store entry expired");
                    self.remove(key);
                    return Lookup::Expired;
                }
                value
            }
        };
        if value.is_null() {
            return Lookup::Missing;
        }
        match serde_json::from_value(value) {
            Ok(value) => Lookup::Present(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "store entry has an unexpected shape");
                Lookup::Missing
            }
        }
    }

    /// Raw stored value; text that is not JSON comes back as a string.
    pub fn get_raw(&self, key: &str) -> Option<Value> {
        let text = match self.backend.read(key) {
            Ok(text) => text?,
            Err(e) => {
                log_failure("get", &e);
                return None;
            }
        };
        if text.is_empty() {
            return None;
        }
        Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    /// Deletes `key`; a missing key is not an error.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.delete(key) {
            log_failure("remove", &e);
        }
    }

    /// Deletes every key.
    pub fn clear(&self) {
        if let Err(e) = self.backend.clear() {
            log_failure("clear", &e);
        }
    }

    /// Whether `key` is stored, expired or not.
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.backend.read(key), Ok(Some(_)))
    }

    /// Stored keys, empty when the backend cannot list them.
    pub fn keys(&self) -> Vec<String> {
        self.backend.keys().unwrap_or_else(|e| {
            log_failure("keys", &e);
            Vec::new()
        })
    }

    /// Stored size of `key` in bytes, zero when missing.
    pub fn item_size(&self, key: &str) -> usize {
        match self.backend.read(key) {
            Ok(Some(text)) => text.len(),
            Ok(None) => 0,
            Err(e) => {
                log_failure("item_size", &e);
                0
            }
        }
    }

    /// Every entry as stored, expiry wrappers included.
    pub fn all_items(&self) -> BTreeMap<String, Value> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get_raw(&key).map(|value| (key, value)))
            .collect()
    }

    /// Bytes used against the nominal capacity.
    pub fn usage(&self) -> StorageUsage {
        let used: usize = self.keys().iter().map(|key| self.item_size(key)).sum();
        let percentage = (used as f64 / NOMINAL_CAPACITY as f64 * 100.0).min(100.0);
        StorageUsage {
            used,
            available: NOMINAL_CAPACITY,
            percentage,
        }
    }
}

enum Unwrapped {
    Plain(Value),
    Expiring { value: Value, expire_at: i64 },
}

fn unwrap_expiring(raw: Value) -> Unwrapped {
    let Value::Object(mut object) = raw else {
        return Unwrapped::Plain(raw);
    };
    match (object.contains_key("value"), expire_at(&object)) {
        (true, Some(expire_at)) => Unwrapped::Expiring {
            value: object.remove("value").unwrap_or(Value::Null),
            expire_at,
        },
        _ => Unwrapped::Plain(Value::Object(object)),
    }
}

fn expire_at(object: &Map<String, Value>) -> Option<i64> {
    [EXPIRE_AT, LEGACY_EXPIRE_AT]
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_f64))
        .map(|millis| millis as i64)
}

fn log_failure(operation: &str, error: &StoreError) {
    tracing::warn!(operation, error = %error, "store operation failed");
}
