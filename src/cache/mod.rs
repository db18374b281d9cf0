//! Verification cache.
//!
//! [`VerificationCache`] remembers whether a remote reference was reachable
//! the last time the [`Prober`](crate::probe::Prober) checked it.
//!
//! # Architecture
//!
//! - Moka-backed store keyed on the reference location. Reads don't block
//!   and every write replaces a whole entry, so concurrent probers of the
//!   same key resolve as last-write-wins.
//! - Expiry is lazy and logical: [`lookup`](VerificationCache::lookup)
//!   treats entries older than the TTL as absent, but leaves them in place.
//!   [`prune`](VerificationCache::prune) (or the optional
//!   [`spawn_pruner`](VerificationCache::spawn_pruner) task) removes them.
//! - Ages are measured with `tokio::time::Instant`, so a paused test clock
//!   drives expiry deterministically.
//!
//! The cache is an explicit instance owned by whoever builds it. Share one
//! between resolvers with `Arc`.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::telemetry;
use crate::types::AssetReference;
use crate::{Result, SigilError};

/// Configuration for the verification cache.
///
/// ```rust
/// # use sigil::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(50_000)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time after which an entry is treated as absent. Default: 30 minutes.
    pub ttl: Duration,
    /// Maximum stored entries (LRU beyond this). Default: 10,000.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            max_entries: 10_000,
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the maximum number of stored entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }
}

/// The last known verification result for a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Cache key (the reference location).
    pub key: String,
    /// The reference that was checked.
    pub reference: AssetReference,
    /// Whether the reference was reachable.
    pub is_valid: bool,
    /// When the result was recorded.
    pub checked_at: Instant,
    /// Retries spent before the result was reached.
    pub retry_count: u32,
}

impl CacheEntry {
    /// Age of the entry relative to now.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.checked_at)
    }

    /// Whether the entry is older than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

/// TTL-bounded store of verification results.
pub struct VerificationCache {
    entries: Cache<String, CacheEntry>,
    ttl: Duration,
}

impl VerificationCache {
    /// Create an empty cache from the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = Cache::builder().max_capacity(config.max_entries).build();
        Self {
            entries,
            ttl: config.ttl,
        }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry.
    ///
    /// Returns `None` if the key is absent or its entry is older than the
    /// TTL. Emits cache hit/miss metrics.
    pub fn lookup(&self, key: &str) -> Option<CacheEntry> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                debug!(key, is_valid = entry.is_valid, "verification cache hit");
                Some(entry)
            }
            _ => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Overwrite the entry for `key`, stamping it now with a zero retry count.
    pub fn put(&self, key: &str, reference: AssetReference, is_valid: bool) {
        self.record(key, reference, is_valid, 0);
    }

    /// Overwrite the entry for `key`, keeping the number of retries spent.
    pub fn record(&self, key: &str, reference: AssetReference, is_valid: bool, retry_count: u32) {
        let entry = CacheEntry {
            key: key.to_string(),
            reference,
            is_valid,
            checked_at: Instant::now(),
            retry_count,
        };
        self.entries.insert(key.to_string(), entry);
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let expired: Vec<Arc<String>> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl))
            .map(|(key, _)| key)
            .collect();
        for key in &expired {
            self.entries.invalidate(key.as_str());
        }
        if !expired.is_empty() {
            info!(removed = expired.len(), "pruned expired verification entries");
        }
        expired.len()
    }

    /// Run [`prune`](Self::prune) every `interval` on the current tokio runtime.
    ///
    /// Abort the returned handle to stop the sweep. A zero `interval` is
    /// rejected with [`SigilError::Configuration`] and nothing is spawned.
    pub fn spawn_pruner(self: Arc<Self>, interval: Duration) -> Result<JoinHandle<()>> {
        if interval.is_zero() {
            return Err(SigilError::Configuration(
                "cache prune interval must be non-zero".into(),
            ));
        }
        Ok(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.prune();
            }
        }))
    }

    /// Number of stored entries, including expired ones not yet pruned.
    ///
    /// Moka applies writes lazily; the count is exact after pending tasks run.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Whether the cache stores no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for VerificationCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "https://cdn.example.org/ankh.png";

    fn remote() -> AssetReference {
        AssetReference::remote(KEY)
    }

    #[test]
    fn miss_on_empty_cache() {
        let cache = VerificationCache::default();
        assert!(cache.lookup(KEY).is_none());
    }

    #[test]
    fn put_then_lookup() {
        let cache = VerificationCache::default();
        cache.put(KEY, remote(), true);

        let entry = cache.lookup(KEY).unwrap();
        assert_eq!(entry.key, KEY);
        assert!(entry.is_valid);
        assert_eq!(entry.retry_count, 0);
    }

    #[test]
    fn put_overwrites_and_resets_retry_count() {
        let cache = VerificationCache::default();
        cache.record(KEY, remote(), false, 2);
        cache.put(KEY, remote(), true);

        let entry = cache.lookup(KEY).unwrap();
        assert!(entry.is_valid);
        assert_eq!(entry.retry_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn entry_visible_until_ttl_then_absent() {
        let ttl = Duration::from_secs(30 * 60);
        let cache = VerificationCache::new(&CacheConfig::new().ttl(ttl));
        cache.put(KEY, remote(), true);

        tokio::time::advance(ttl - Duration::from_millis(1)).await;
        assert!(cache.lookup(KEY).is_some());

        tokio::time::advance(Duration::from_millis(2)).await;
        assert!(cache.lookup(KEY).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_stay_stored_until_pruned() {
        let ttl = Duration::from_secs(60);
        let cache = VerificationCache::new(&CacheConfig::new().ttl(ttl));
        cache.put(KEY, remote(), false);
        cache.put("https://cdn.example.org/fresh.png", remote(), true);

        tokio::time::advance(Duration::from_secs(45)).await;
        cache.put("https://cdn.example.org/fresh.png", remote(), true);
        tokio::time::advance(Duration::from_secs(30)).await;

        assert!(cache.lookup(KEY).is_none());
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.prune(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.lookup("https://cdn.example.org/fresh.png").is_some());
    }

    #[test]
    fn prune_on_fresh_cache_is_noop() {
        let cache = VerificationCache::default();
        cache.put(KEY, remote(), true);
        assert_eq!(cache.prune(), 0);
        assert!(cache.lookup(KEY).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn pruner_task_sweeps_periodically() {
        let ttl = Duration::from_secs(10);
        let cache = Arc::new(VerificationCache::new(&CacheConfig::new().ttl(ttl)));
        cache.put(KEY, remote(), true);

        let handle = Arc::clone(&cache)
            .spawn_pruner(Duration::from_secs(30))
            .unwrap();
        tokio::time::sleep(Duration::from_secs(31)).await;

        assert!(cache.is_empty());
        handle.abort();
    }

    #[tokio::test]
    async fn zero_prune_interval_is_rejected() {
        let cache = Arc::new(VerificationCache::default());
        cache.put(KEY, remote(), true);

        let result = Arc::clone(&cache).spawn_pruner(Duration::ZERO);

        assert!(matches!(result, Err(SigilError::Configuration(_))));
        assert!(cache.lookup(KEY).is_some());
    }

    #[test]
    fn clear_evicts_everything() {
        let cache = VerificationCache::default();
        cache.put(KEY, remote(), true);
        cache.clear();
        assert!(cache.lookup(KEY).is_none());
    }
}
