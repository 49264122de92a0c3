//! In-memory time-boxed caching for fetched market data.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// Defines how a single fetch interacts with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve a fresh entry if present; otherwise fetch and store the result. (Default)
    #[default]
    Use,
    /// Always fetch, then store the result in place of any existing entry.
    Refresh,
    /// Always fetch and leave the cache untouched.
    Bypass,
}

impl CacheMode {
    pub const fn reads(self) -> bool {
        matches!(self, Self::Use)
    }

    pub const fn writes(self) -> bool {
        matches!(self, Self::Use | Self::Refresh)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) < self.ttl
    }
}

#[derive(Debug)]
struct CacheInner<K, V> {
    map: HashMap<K, CacheEntry<V>>,
    default_ttl: Duration,
}

/// Async-safe map from request key to value with a per-entry time-to-live.
///
/// An entry is served only while `now - inserted_at < ttl`. Values are
/// replaced wholesale on insert, so readers never observe a partial update.
pub struct TtlCache<K, V> {
    inner: Arc<RwLock<CacheInner<K, V>>>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache").finish_non_exhaustive()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache whose entries live for `default_ttl`.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner {
                map: HashMap::new(),
                default_ttl,
            })),
        }
    }

    /// Create a cache that never stores anything (TTL is zero).
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Fresh value for `key`, if any.
    pub async fn get(&self, key: &K) -> Option<V> {
        let store = self.inner.read().await;
        let now = Instant::now();
        store
            .map
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key` with the default TTL, replacing any previous entry.
    ///
    /// No-op on a disabled cache.
    pub async fn insert(&self, key: K, value: V) {
        let mut store = self.inner.write().await;
        let ttl = store.default_ttl;
        if ttl == Duration::ZERO {
            return;
        }

        store.map.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Remove entries that are no longer fresh.
    pub async fn clear_expired(&self) {
        let mut store = self.inner.write().await;
        let now = Instant::now();
        store.map.retain(|_, entry| entry.is_fresh(now));
    }

    pub async fn clear(&self) {
        self.inner.write().await.map.clear();
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }

    pub async fn ttl(&self) -> Duration {
        self.inner.read().await.default_ttl
    }

    pub async fn is_disabled(&self) -> bool {
        self.ttl().await == Duration::ZERO
    }
}
