//! In-memory TTL cache for aggregate reports.
//!
//! Expired entries are treated as absent and dropped lazily on the next
//! write. Invalidation is coarse: the whole key prefix of a lottery goes at
//! once. A reader racing an invalidation may still see the old value; that
//! is acceptable within the TTL.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::AggregateReport;

/// Cached aggregates keyed by the query-derived string.
#[derive(Clone)]
pub struct StatsCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl_seconds: i64,
}

struct CacheEntry {
    report: AggregateReport,
    expires_at: DateTime<Utc>,
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::with_ttl(Self::TTL_SECONDS)
    }
}

impl StatsCache {
    /// Default entry lifetime: one hour.
    pub const TTL_SECONDS: i64 = 60 * 60;

    pub fn new() -> Self {
        Self::default()
    }

    /// A cache with a custom entry lifetime in seconds.
    pub fn with_ttl(ttl_seconds: i64) -> Self {
        Self {
            entries: Arc::default(),
            ttl_seconds,
        }
    }

    /// Fetch an entry; expired entries count as misses.
    pub fn get(&self, key: &str) -> Option<AggregateReport> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.report.clone())
    }

    /// Store an entry with the cache's TTL.
    pub fn set(&self, key: impl Into<String>, report: AggregateReport) {
        let mut entries = self.entries.write();
        let now = Utc::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.into(),
            CacheEntry {
                report,
                expires_at: now + Duration::seconds(self.ttl_seconds),
            },
        );
    }

    /// Drop every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        self.entries.write().retain(|key, _| !key.starts_with(prefix));
    }

    /// Number of live (non-expired) entries.
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .read()
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
