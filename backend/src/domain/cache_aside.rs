//! Cache-aside combinator.
//!
//! Wraps any "compute + cache key + TTL" operation: probe the fast cache,
//! fall back to the compute closure on miss or on any cache error, then
//! best-effort repopulate. Cache failures (unreachable backend, corrupt
//! payload, failed write) are logged and absorbed here; only the compute
//! path can fail the caller. Reusable beyond dashboard stats.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::StatsCache;

/// Serve `key` from `cache`, recomputing and repopulating on miss.
///
/// # Errors
/// Propagates only errors from `compute`; every cache-tier failure is
/// treated as a miss.
pub async fn fetch_or_compute<C, T, F, Fut>(
    cache: &C,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<T, Error>
where
    C: StatsCache + ?Sized,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => return Ok(value),
            Err(error) => {
                warn!(key, error = %error, "cached payload failed to deserialise; recomputing");
            }
        },
        Ok(None) => {}
        Err(error) => {
            warn!(key, error = %error, "cache read failed; recomputing");
        }
    }

    let value = compute().await?;

    match serde_json::to_string(&value) {
        Ok(raw) => {
            if let Err(error) = cache.put(key, &raw, ttl).await {
                // The computed value is still valid; a failed write only
                // costs the next caller a recompute.
                warn!(key, error = %error, "cache write failed; serving computed value");
            }
        }
        Err(error) => {
            warn!(key, error = %error, "computed value failed to serialise for caching");
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{FixtureStatsCache, MockStatsCache, StatsCacheError};

    async fn compute_42() -> Result<u32, Error> {
        Ok(42)
    }

    #[tokio::test]
    async fn serves_cached_value_without_computing() {
        let cache = FixtureStatsCache::new();
        cache
            .put("answer", "41", Duration::from_secs(60))
            .await
            .expect("seed");

        let value: u32 = fetch_or_compute(&cache, "answer", Duration::from_secs(60), || async {
            panic!("compute must not run on a cache hit")
        })
        .await
        .expect("served from cache");
        assert_eq!(value, 41_u32);
    }

    #[tokio::test]
    async fn computes_and_repopulates_on_miss() {
        let cache = FixtureStatsCache::new();

        let value = fetch_or_compute(&cache, "answer", Duration::from_secs(60), compute_42)
            .await
            .expect("computed");
        assert_eq!(value, 42);
        assert_eq!(
            cache.get("answer").await.expect("get"),
            Some("42".to_owned())
        );
    }

    #[tokio::test]
    async fn treats_cache_errors_as_misses() {
        let mut cache = MockStatsCache::new();
        cache
            .expect_get()
            .return_once(|_| Err(StatsCacheError::backend("refused")));
        cache
            .expect_put()
            .return_once(|_, _, _| Err(StatsCacheError::backend("refused")));

        let value = fetch_or_compute(&cache, "answer", Duration::from_secs(60), compute_42)
            .await
            .expect("cache outage never fails the read");
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn treats_corrupt_payload_as_a_miss() {
        let cache = FixtureStatsCache::new();
        cache
            .put("answer", "not-a-number", Duration::from_secs(60))
            .await
            .expect("seed");

        let value = fetch_or_compute(&cache, "answer", Duration::from_secs(60), compute_42)
            .await
            .expect("recomputed");
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn compute_failure_propagates_and_caches_nothing() {
        let cache = FixtureStatsCache::new();

        let result: Result<u32, Error> =
            fetch_or_compute(&cache, "answer", Duration::from_secs(60), || async {
                Err(Error::service_unavailable("source down"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(cache.get("answer").await.expect("get"), None);
    }
}
