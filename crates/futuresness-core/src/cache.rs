//! Bounded, time-limited cache of analysis reports.
//!
//! Keys are content fingerprints, so a cached report is only ever returned
//! for byte-identical text analyzed with identical options. The clock is
//! passed in by the caller.

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use sha2::{Digest, Sha256};

use crate::analysis::AnalyzeOptions;
use crate::reports::AnalysisReport;

/// Default number of cached reports.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Default time-to-live for cached reports, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// SHA-256 fingerprint of a document and the options it was analyzed with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Fingerprint `text` analyzed under `options`.
    pub fn new(text: &str, options: &AnalyzeOptions) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update([0]);
        hasher.update(options.cooccurrence_window.to_le_bytes());
        match options.snippet_context {
            Some(ctx) => {
                hasher.update([1]);
                hasher.update((ctx as u64).to_le_bytes());
            }
            None => hasher.update([0]),
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// The hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
struct Entry {
    report: AnalysisReport,
    inserted_at: Instant,
}

/// FIFO cache with a per-entry time-to-live.
#[derive(Debug, Clone)]
pub struct ResultCache {
    capacity: usize,
    ttl: Duration,
    entries: IndexMap<CacheKey, Entry>,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` reports for `ttl` each.
    ///
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Look up a report, dropping it if it has expired.
    pub fn get(&mut self, key: &CacheKey, now: Instant) -> Option<AnalysisReport> {
        let entry = self.entries.get(key)?;
        if now.saturating_duration_since(entry.inserted_at) < self.ttl {
            tracing::debug!(key = key.as_str(), "cache hit");
            return Some(entry.report.clone());
        }
        self.entries.shift_remove(key);
        tracing::debug!(key = key.as_str(), "cache entry expired");
        None
    }

    /// Store a report.
    ///
    /// An existing key is replaced in place; otherwise the oldest entries are
    /// evicted to make room.
    pub fn put(&mut self, key: CacheKey, report: AnalysisReport, now: Instant) {
        if self.capacity == 0 {
            return;
        }
        let entry = Entry {
            report,
            inserted_at: now,
        };
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = entry;
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, entry);
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Time-to-live of each entry.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(
            DEFAULT_CACHE_CAPACITY,
            Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;

    fn report(text: &str) -> AnalysisReport {
        Analyzer::builtin()
            .unwrap()
            .analyze(text, &AnalyzeOptions::default())
    }

    fn key(text: &str) -> CacheKey {
        CacheKey::new(text, &AnalyzeOptions::default())
    }

    #[test]
    fn key_depends_on_text_and_options() {
        let opts = AnalyzeOptions::default();
        assert_eq!(CacheKey::new("a", &opts), CacheKey::new("a", &opts));
        assert_ne!(CacheKey::new("a", &opts), CacheKey::new("b", &opts));

        let wider = AnalyzeOptions {
            cooccurrence_window: 200,
            ..opts
        };
        assert_ne!(CacheKey::new("a", &opts), CacheKey::new("a", &wider));

        let no_snippets = AnalyzeOptions {
            snippet_context: None,
            ..opts
        };
        assert_ne!(CacheKey::new("a", &opts), CacheKey::new("a", &no_snippets));
        assert_eq!(CacheKey::new("a", &opts).as_str().len(), 64);
    }

    #[test]
    fn hit_within_ttl() {
        let mut cache = ResultCache::new(4, Duration::from_secs(10));
        let now = Instant::now();
        let r = report("delphi");
        cache.put(key("delphi"), r.clone(), now);
        assert_eq!(cache.get(&key("delphi"), now + Duration::from_secs(9)), Some(r));
    }

    #[test]
    fn expired_entries_are_removed() {
        let mut cache = ResultCache::new(4, Duration::from_secs(10));
        let now = Instant::now();
        cache.put(key("delphi"), report("delphi"), now);
        assert!(cache.get(&key("delphi"), now + Duration::from_secs(10)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut cache = ResultCache::new(2, Duration::from_secs(60));
        let now = Instant::now();
        cache.put(key("a"), report("a"), now);
        cache.put(key("b"), report("b"), now);
        cache.put(key("c"), report("c"), now);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("a"), now).is_none());
        assert!(cache.get(&key("b"), now).is_some());
        assert!(cache.get(&key("c"), now).is_some());
    }

    #[test]
    fn replacing_a_key_does_not_evict() {
        let mut cache = ResultCache::new(2, Duration::from_secs(60));
        let now = Instant::now();
        cache.put(key("a"), report("a"), now);
        cache.put(key("b"), report("b"), now);
        cache.put(key("a"), report("a"), now + Duration::from_secs(1));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("b"), now).is_some());
    }

    #[test]
    fn zero_capacity_disables() {
        let mut cache = ResultCache::new(0, Duration::from_secs(60));
        let now = Instant::now();
        cache.put(key("a"), report("a"), now);
        assert!(cache.is_empty());
        assert!(cache.get(&key("a"), now).is_none());
    }
}
