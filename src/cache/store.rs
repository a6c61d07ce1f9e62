// Cache store for fetched responses.
// Holds decoded JSON keyed by request identifier and checks entry age against a TTL.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::policy::Freshness;

/// A decoded response and the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The decoded response body.
    pub value: Value,
    /// When the fetch that produced `value` completed.
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            cached_at: Utc::now(),
        }
    }

    /// Time elapsed since the entry was stored.
    ///
    /// An entry stamped in the future has no meaningful age and reports `Duration::MAX`.
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX)
    }

    /// Classify the entry against a TTL. An age equal to the TTL is stale.
    pub fn freshness(&self, ttl: Duration) -> Freshness {
        if self.age() < ttl {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.freshness(ttl) == Freshness::Fresh
    }
}

/// In-memory map of request identifiers to cached responses.
///
/// Unbounded and never swept: entries are judged stale when looked up and are
/// only ever replaced, never removed (apart from [`CacheStore::clear`]).
/// Share it between fetchers with an `Arc`.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entry for `key`, if any.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().get(key).cloned()
    }

    /// Insert `entry` under `key`, returning the entry it replaced.
    pub fn insert(&self, key: impl Into<String>, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.write().insert(key.into(), entry)
    }

    /// Store a freshly fetched value under `key`, stamped with the current time.
    pub fn store(&self, key: impl Into<String>, value: Value) -> CacheEntry {
        let entry = CacheEntry::new(value);
        self.insert(key, entry.clone());
        entry
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
