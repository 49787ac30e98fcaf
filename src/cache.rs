//! Process-wide memoization for search results and resolved image URLs.
//!
//! Both caches are injected into the orchestrator/resolver rather than held
//! in statics. Expired entries are evicted lazily on lookup; nothing sweeps
//! in the background.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::model::SearchResultPage;
use crate::normalization::text::{normalize, normalize_brand};

struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Lock-guarded map with per-entry expiry. Concurrent writers to one key are
/// last-writer-wins.
pub struct TtlCache<K, V> {
    inner: Arc<Mutex<HashMap<K, Entry<V>>>>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Live value for `key`; a stale entry is removed and reported as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut map = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let now = Instant::now();
        match map.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                map.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value`; `ttl = None` keeps it for the life of the process.
    pub fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        let expires_at = ttl.map(|t| Instant::now() + t);
        let mut map = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        map.insert(key, Entry { value, expires_at });
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deterministic cache key for one search request. Inputs are normalized
/// first so "Mouse " and "mouse" share an entry.
pub fn result_cache_key(query: &str, vendor: &str, page_number: u32, page_size: u32) -> String {
    let raw = format!(
        "{}|{}|{}|{}",
        normalize(query),
        normalize_brand(vendor),
        page_number,
        page_size
    );
    let digest = Sha256::digest(raw.as_bytes());
    let mut out = String::with_capacity(64);
    for b in digest {
        use std::fmt::Write;
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}

/// Search results keyed by [`result_cache_key`].
#[derive(Clone)]
pub struct ResultCache {
    entries: TtlCache<String, SearchResultPage>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: TtlCache::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<SearchResultPage> {
        self.entries.get(&key.to_string())
    }

    pub fn put(&self, key: String, page: SearchResultPage) {
        self.entries.put(key, page, Some(self.ttl));
    }
}

/// Resolved image URLs keyed by vendor part number (or part number).
#[derive(Clone, Default)]
pub struct ImageCache {
    entries: TtlCache<String, String>,
    ttl: Option<Duration>,
}

impl ImageCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: TtlCache::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(&key.to_string())
    }

    pub fn put(&self, key: &str, url: &str) {
        self.entries.put(key.to_string(), url.to_string(), self.ttl);
    }
}
