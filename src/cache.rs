//! Time-bounded quote cache
//!
//! One store per process, injected wherever quotes are read or written.
//! Entries expire lazily: a stale entry is reported as absent but stays in
//! the map until it is overwritten.

use crate::models::Quote;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Default lifetime of a cached quote
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub quote: Quote,
    pub fetched_at: Instant,
}

impl CacheEntry {
    fn new(quote: Quote) -> Self {
        Self {
            quote,
            fetched_at: Instant::now(),
        }
    }

    /// Valid while `now - fetched_at < max_age`
    pub fn is_fresh(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < max_age
    }
}

pub struct QuoteCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    max_age: Duration,
}

impl QuoteCache {
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_age,
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Cached quote for `symbol`, if present and not expired
    pub async fn get(&self, symbol: &str) -> Option<Quote> {
        let entries = self.entries.read().await;
        let now = Instant::now();

        match entries.get(symbol) {
            Some(entry) if entry.is_fresh(now, self.max_age) => {
                debug!(symbol, "Quote cache hit");
                Some(entry.quote.clone())
            }
            Some(_) => {
                debug!(symbol, "Quote cache entry expired");
                None
            }
            None => {
                debug!(symbol, "Quote cache miss");
                None
            }
        }
    }

    /// Store `quote`, replacing any previous entry and resetting its age
    pub async fn set(&self, symbol: &str, quote: Quote) {
        let mut entries = self.entries.write().await;
        entries.insert(symbol.to_string(), CacheEntry::new(quote));
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(symbol: &str, price: &str) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            price: price.to_string(),
            change_percent: "0.50%".to_string(),
            volume: "1000".to_string(),
            is_real_time: true,
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = QuoteCache::default();
        assert!(cache.get("AAPL").await.is_none());

        cache.set("AAPL", quote("AAPL", "150.00")).await;
        assert_eq!(cache.get("AAPL").await.unwrap().price, "150.00");
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = QuoteCache::default();
        cache.set("AAPL", quote("AAPL", "150.00")).await;
        cache.set("AAPL", quote("AAPL", "151.00")).await;

        assert_eq!(cache.get("AAPL").await.unwrap().price, "151.00");
        assert_eq!(cache.len().await, 1);
    }

    #[test]
    fn test_zero_max_age_is_always_expired() {
        let cache = QuoteCache::new(Duration::ZERO);
        tokio_test::block_on(cache.set("MSFT", quote("MSFT", "400.00")));

        // Expired entries read as absent but are not evicted
        assert!(tokio_test::block_on(cache.get("MSFT")).is_none());
        assert_eq!(tokio_test::block_on(cache.len()), 1);
    }

    #[test]
    fn test_freshness_boundary() {
        let max_age = Duration::from_secs(3600);
        let entry = CacheEntry::new(quote("NVDA", "900.00"));
        let start = entry.fetched_at;

        assert!(entry.is_fresh(start, max_age));
        assert!(entry.is_fresh(start + max_age - Duration::from_millis(1), max_age));
        assert!(!entry.is_fresh(start + max_age, max_age));
        assert!(!entry.is_fresh(start + max_age * 2, max_age));
    }
}
