//! Cache data structures with TTL support

use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One cached upstream payload.
///
/// Entries are replaced whole on every successful refetch. The payload is an
/// immutable JSON tree shared by reference, so readers never see a half-written
/// value.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Arc<Value>,
    pub fetched_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    /// Creates a new entry stamped with the current instant
    pub fn new(payload: Arc<Value>, ttl: Duration) -> Self {
        Self {
            payload,
            fetched_at: Instant::now(),
            ttl,
        }
    }

    /// Fresh against the TTL the entry was written with
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_within(self.ttl)
    }

    /// Fresh against a caller-supplied TTL
    pub fn is_fresh_within(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// Gets the remaining time until expiration
    pub fn time_until_expiry(&self) -> Duration {
        self.ttl.saturating_sub(self.fetched_at.elapsed())
    }
}

/// Counters and sizes for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub fresh_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub fetch_failures: u64,
}
