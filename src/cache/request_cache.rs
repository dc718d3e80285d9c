//! In-memory request cache with per-entry TTL expiry.
//!
//! Memoizes decoded backend responses for a bounded window so read-mostly
//! screens (alerts, summaries, connector lists) don't refetch on every
//! render. Expiry is lazy: an expired entry is removed on the `get` that
//! finds it stale — there is no background sweep. Invalidation is explicit,
//! by key or by key regex, and is driven by mutations that are known to
//! change the underlying data.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::debug;

/// A single cached value with its insertion time and lifetime.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    stored_at: Instant,
    ttl: Duration,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() <= self.ttl
    }
}

/// TTL-based memoization for asynchronous fetches, keyed by caller-chosen
/// strings (typically `"<resource>-<params>"`).
///
/// `get` returns `Option<T>`, so a cached JSON `null` is `Some(Value::Null)`
/// and never mistaken for a miss. The cache itself never fails: `set`
/// accepts any payload, `invalidate` on a missing key is a no-op, and a
/// pattern matching zero keys removes nothing.
#[derive(Debug)]
pub struct RequestCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T> Default for RequestCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> RequestCache<T> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up a cached value. Returns `None` if the key is absent or the
    /// entry's TTL has elapsed; an expired entry is removed as a side effect
    /// of the failed lookup.
    pub fn get(&mut self, key: &str) -> Option<T> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh() => Some(entry.data.clone()),
            Some(_) => {
                debug!(key, "cache entry expired, removing");
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `data` under `key` with the given lifetime, unconditionally
    /// overwriting any existing entry. A new `set` always yields a fresh
    /// entry regardless of the old one's state.
    pub fn set(&mut self, key: impl Into<String>, data: T, ttl: Duration) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                data,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Remove the entry for `key` if present. Missing keys are a no-op.
    pub fn invalidate(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            debug!(key, "cache entry invalidated");
        }
    }

    /// Remove every entry whose key matches `pattern` and return the number
    /// removed. Used to bulk-invalidate key families after a mutation, e.g.
    /// `^quickbooks-` after disconnecting the QuickBooks connector.
    pub fn invalidate_pattern(&mut self, pattern: &Regex) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.is_match(key));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(pattern = %pattern, removed, "cache entries invalidated by pattern");
        }
        removed
    }

    /// Remove all entries. Called on logout.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries currently stored, including ones that have expired
    /// but not yet been lazily removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the cached value for `key` if fresh; otherwise await `fetcher`,
    /// store its result under `key` with `ttl`, and return it. A `fetcher`
    /// error propagates unchanged and nothing is stored.
    ///
    /// There is no de-duplication of in-flight fetches: two concurrent calls
    /// for the same key before the first resolves will both invoke `fetcher`.
    /// The callers here are idempotent GETs, so the duplicate request is
    /// tolerated rather than hidden behind a single-flight map.
    pub async fn with_cache<F, Fut, E>(
        &mut self,
        key: &str,
        ttl: Duration,
        fetcher: F,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(data) = self.get(key) {
            debug!(key, "cache hit");
            return Ok(data);
        }
        debug!(key, "cache miss, fetching");
        let data = fetcher().await?;
        self.set(key, data.clone(), ttl);
        Ok(data)
    }
}
