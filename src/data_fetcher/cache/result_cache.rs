//! Time-bounded memoization of upstream payloads keyed by request

use lru::LruCache;
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::types::{CacheEntry, CacheStats};
use crate::data_fetcher::api::{EndpointRequest, UpstreamClient};
use crate::error::AppError;

/// Caches the last successful payload per [`EndpointRequest`].
///
/// The store is unbounded: an entry only goes away when a successful refetch
/// overwrites it or [`ResultCache::clear`] is called. LRU order is kept for the
/// debug listing. The lock is never held across the network call, so two
/// callers racing on one key may both fetch; the later write wins.
pub struct ResultCache {
    client: UpstreamClient,
    entries: RwLock<LruCache<EndpointRequest, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    fetch_failures: AtomicU64,
}

impl ResultCache {
    pub fn new(client: UpstreamClient) -> Self {
        Self {
            client,
            entries: RwLock::new(LruCache::unbounded()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &UpstreamClient {
        &self.client
    }

    /// Returns the cached payload when it is younger than `ttl`, otherwise
    /// fetches through the upstream client.
    ///
    /// On failure the existing entry is left exactly as it was and the error
    /// is returned unchanged; no fallback value is synthesized.
    #[instrument(skip(self), fields(request = %request))]
    pub async fn get_or_fetch(
        &self,
        request: &EndpointRequest,
        ttl: Duration,
    ) -> Result<Arc<Value>, AppError> {
        {
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get(request) {
                if entry.is_fresh_within(ttl) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        "Cache hit: request={}, age={:?}, ttl={:?}",
                        request,
                        entry.age(),
                        ttl
                    );
                    return Ok(Arc::clone(&entry.payload));
                }
                debug!(
                    "Stale cache entry: request={}, age={:?}, ttl={:?}",
                    request,
                    entry.age(),
                    ttl
                );
            } else {
                debug!("Cache miss: request={}", request);
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        match self.client.call(request).await {
            Ok(value) => {
                let payload = Arc::new(value);
                let mut entries = self.entries.write().await;
                entries.put(request.clone(), CacheEntry::new(Arc::clone(&payload), ttl));
                info!("Cached upstream payload: request={}, ttl={:?}", request, ttl);
                Ok(payload)
            }
            Err(e) => {
                self.fetch_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "Upstream fetch failed, keeping previous cache entry: request={}, error={}",
                    request, e
                );
                Err(e)
            }
        }
    }

    /// Reads an entry without a freshness check or a network call.
    pub async fn peek(&self, request: &EndpointRequest) -> Option<CacheEntry> {
        self.entries.read().await.peek(request).cloned()
    }

    /// Gets cache statistics for monitoring purposes
    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        CacheStats {
            entries: entries.len(),
            fresh_entries: entries.iter().filter(|(_, entry)| entry.is_fresh()).count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
        }
    }

    /// Lists entries from most to least recently used
    pub async fn debug_info(&self) -> String {
        let stats = self.stats().await;
        let mut info = format!(
            "Result Cache: {} entries ({} fresh), {} hits, {} misses, {} failed fetches\n",
            stats.entries, stats.fresh_entries, stats.hits, stats.misses, stats.fetch_failures
        );
        let entries = self.entries.read().await;
        for (request, entry) in entries.iter() {
            let _ = writeln!(
                info,
                "  {request}: age={:?}, expires_in={:?}",
                entry.age(),
                entry.time_until_expiry()
            );
        }
        info
    }

    /// Clears all cache entries
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
