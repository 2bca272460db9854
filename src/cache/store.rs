// In-memory response cache.
// Holds the last good JSON document per cache key together with its fetch time.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Default TTL for fetched data: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Cached response with the time it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The cached document.
    pub data: Value,
    /// When the document was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(data: Value, fetched_at: DateTime<Utc>) -> Self {
        Self { data, fetched_at }
    }

    /// Whether the entry is still within its TTL at `now`.
    ///
    /// An entry dated in the future (clock moved backwards) is treated as
    /// expired so it gets refetched.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let elapsed = now
            .signed_duration_since(self.fetched_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed < ttl
    }
}

/// Cache table keyed by logical query.
///
/// Entries are superseded in place and never evicted.
#[derive(Debug, Default)]
pub struct CacheTable {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl CacheTable {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic elsewhere cannot leave a half-written entry, so a poisoned
    // lock still guards a consistent map.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.lock().get(key).cloned()
    }

    /// Store `entry` under `key`, replacing any previous entry.
    pub fn insert(&self, key: &str, entry: CacheEntry) {
        self.lock().insert(key.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a cached lookup.
///
/// `Stale` is only produced when the live request failed and an older
/// entry was available.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// Fresh from the network.
    Live(T),
    /// Served from cache within the TTL.
    Cached(T),
    /// Live request failed; last good value served regardless of age.
    Stale(T),
    /// Live request failed and nothing was cached.
    Unavailable,
}

impl<T> Fetched<T> {
    pub fn is_available(&self) -> bool {
        !matches!(self, Fetched::Unavailable)
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Fetched::Live(data) | Fetched::Cached(data) | Fetched::Stale(data) => Some(data),
            Fetched::Unavailable => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Live(data) | Fetched::Cached(data) | Fetched::Stale(data) => Some(data),
            Fetched::Unavailable => None,
        }
    }

    /// Transform the payload, keeping the provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Live(data) => Fetched::Live(f(data)),
            Fetched::Cached(data) => Fetched::Cached(f(data)),
            Fetched::Stale(data) => Fetched::Stale(f(data)),
            Fetched::Unavailable => Fetched::Unavailable,
        }
    }

    /// Transform the payload, collapsing to `Unavailable` when `f` yields nothing.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Option<U>) -> Fetched<U> {
        match self {
            Fetched::Live(data) => f(data).map_or(Fetched::Unavailable, Fetched::Live),
            Fetched::Cached(data) => f(data).map_or(Fetched::Unavailable, Fetched::Cached),
            Fetched::Stale(data) => f(data).map_or(Fetched::Unavailable, Fetched::Stale),
            Fetched::Unavailable => Fetched::Unavailable,
        }
    }
}
