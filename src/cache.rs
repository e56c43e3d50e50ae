//! Time-boxed memoization of extractor results
//!
//! [`Cached`] wraps any [`Extractor`] and reuses its last result for a host
//! until the window elapses. Failures are cached the same way as successes.
//! Concurrent lookups of the same host share one call to the inner extractor.

use crate::extract::{Extraction, Extractor};
use crate::target::ScanTarget;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Cache key: extractor name and hostname
type CacheKey = (&'static str, String);

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: Extraction<T>,
    created: Instant,
}

/// Per-key slot; its lock is held while the entry is being filled
type Slot<T> = Arc<tokio::sync::Mutex<Option<CacheEntry<T>>>>;

/// Extractor decorator that memoizes results per hostname
pub struct Cached<E: Extractor> {
    inner: E,
    window: Duration,
    slots: Mutex<HashMap<CacheKey, Slot<E::Output>>>,
}

impl<E: Extractor> Cached<E> {
    /// Wrap `inner`, keeping results for `window`
    pub fn new(inner: E, window: Duration) -> Self {
        Self {
            inner,
            window,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Number of hosts seen, expired entries included
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &CacheKey) -> Slot<E::Output> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(key.clone()).or_default().clone()
    }
}

#[async_trait]
impl<E: Extractor> Extractor for Cached<E> {
    type Output = E::Output;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn extract(&self, target: &ScanTarget) -> Extraction<E::Output> {
        let key = (self.inner.name(), target.host().to_string());
        let slot = self.slot(&key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref().filter(|e| e.created.elapsed() < self.window) {
            debug!(extractor = key.0, host = %key.1, "Cache hit.");
            return cached.value.clone();
        }

        debug!(extractor = key.0, host = %key.1, "Cache miss.");
        let value = self.inner.extract(target).await;
        *entry = Some(CacheEntry {
            value: value.clone(),
            created: Instant::now(),
        });
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls instead of touching the network
    #[derive(Debug, Default)]
    struct Counting {
        calls: AtomicUsize,
        fail: bool,
        latency: Duration,
    }

    #[async_trait]
    impl Extractor for Counting {
        type Output = usize;

        fn name(&self) -> &'static str {
            "counting"
        }

        async fn extract(&self, _target: &ScanTarget) -> Extraction<usize> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if self.fail {
                Err(ExtractError::Timeout)
            } else {
                Ok(n)
            }
        }
    }

    fn target(input: &str) -> ScanTarget {
        ScanTarget::parse(input).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn reuses_result_within_window() {
        let cached = Cached::new(Counting::default(), Duration::from_secs(3600));

        assert_eq!(cached.extract(&target("client.com")).await, Ok(1));
        tokio::time::advance(Duration::from_secs(1800)).await;
        assert_eq!(cached.extract(&target("https://client.com/")).await, Ok(1));
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn refetches_after_window() {
        let cached = Cached::new(Counting::default(), Duration::from_secs(3600));

        assert_eq!(cached.extract(&target("client.com")).await, Ok(1));
        assert_eq!(cached.extract(&target("client.com")).await, Ok(1));
        tokio::time::advance(Duration::from_secs(3601)).await;
        assert_eq!(cached.extract(&target("client.com")).await, Ok(2));
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn hosts_are_cached_separately() {
        let cached = Cached::new(Counting::default(), Duration::from_secs(3600));

        assert_eq!(cached.extract(&target("one.com")).await, Ok(1));
        assert_eq!(cached.extract(&target("two.com")).await, Ok(2));
        assert_eq!(cached.extract(&target("one.com")).await, Ok(1));
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test]
    async fn failures_are_cached() {
        let inner = Counting {
            fail: true,
            ..Default::default()
        };
        let cached = Cached::new(inner, Duration::from_secs(3600));

        assert_eq!(cached.extract(&target("client.com")).await, Err(ExtractError::Timeout));
        assert_eq!(cached.extract(&target("client.com")).await, Err(ExtractError::Timeout));
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_lookups_share_one_call() {
        let inner = Counting {
            latency: Duration::from_millis(200),
            ..Default::default()
        };
        let cached = Cached::new(inner, Duration::from_secs(3600));
        let first = target("client.com");
        let second = target("https://client.com/");

        let (a, b) = tokio::join!(cached.extract(&first), cached.extract(&second));
        assert_eq!(a, Ok(1));
        assert_eq!(b, Ok(1));
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_host_does_not_block_others() {
        let inner = Counting {
            latency: Duration::from_secs(10),
            ..Default::default()
        };
        let cached = Cached::new(inner, Duration::from_secs(3600));
        let one = target("one.com");
        let two = target("two.com");

        let start = Instant::now();
        let (a, b) = tokio::join!(cached.extract(&one), cached.extract(&two));
        assert!(a.is_ok() && b.is_ok());
        assert!(start.elapsed() < Duration::from_secs(20));
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn starts_empty() {
        let cached = Cached::new(Counting::default(), Duration::from_secs(1));
        assert!(cached.is_empty());
    }
}
