//! Port for the fast, possibly-unavailable key/value cache.
//!
//! Every caller must treat errors from this port as recoverable: the
//! authoritative store can always serve correctly without the cache, so
//! cache failures degrade latency, never correctness.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

/// Errors raised by cache adapters. Absorbed by callers, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsCacheError {
    /// Cache backend is unreachable or timing out.
    #[error("stats cache backend failure: {message}")]
    Backend { message: String },
}

impl StatsCacheError {
    /// Create a backend error with the given message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Port for TTL'd string storage.
///
/// Values are serialized JSON; deserialization failures are a caller
/// concern so the port stays payload-agnostic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsCache: Send + Sync {
    /// Read the value under `key`, `None` on miss or expiry.
    async fn get(&self, key: &str) -> Result<Option<String>, StatsCacheError>;

    /// Store `value` under `key` for `ttl`.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StatsCacheError>;
}

/// In-memory TTL cache used by tests and no-redis wiring.
#[derive(Debug, Default)]
pub struct FixtureStatsCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl FixtureStatsCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl StatsCache for FixtureStatsCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StatsCacheError> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => {
                Ok(Some(value.clone()))
            }
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StatsCacheError> {
        self.lock()
            .insert(key.to_owned(), (value.to_owned(), Instant::now() + ttl));
        Ok(())
    }
}
