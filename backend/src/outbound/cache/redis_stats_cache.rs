//! Redis-backed `StatsCache` implementation over a `bb8` pool.
//!
//! A small failure breaker sits in front of Redis: after a few consecutive
//! failures the adapter stops talking to the backend for a cooldown window
//! and reports misses instead, so a dead Redis costs one connect timeout
//! per window rather than one per request. Callers already absorb cache
//! errors; the breaker only bounds the latency of the degraded path.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bb8_redis::{RedisConnectionManager, bb8, redis::AsyncCommands};
use tracing::{debug, warn};

use crate::domain::ports::{StatsCache, StatsCacheError};

const FAILURE_THRESHOLD: u32 = 3;
const COOLDOWN: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
struct BreakerState {
    consecutive_failures: u32,
    cooling_until: Option<Instant>,
}

impl BreakerState {
    fn is_cooling(&self, now: Instant) -> bool {
        self.cooling_until.is_some_and(|until| until > now)
    }

    fn record_failure(&mut self, now: Instant) {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= FAILURE_THRESHOLD {
            self.cooling_until = Some(now + COOLDOWN);
            self.consecutive_failures = 0;
        }
    }

    fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.cooling_until = None;
    }
}

/// Redis-backed implementation of the `StatsCache` port.
pub struct RedisStatsCache {
    pool: bb8::Pool<RedisConnectionManager>,
    breaker: Mutex<BreakerState>,
}

impl RedisStatsCache {
    /// Connect to Redis and build the connection pool.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the URL is invalid or the pool cannot
    /// be constructed.
    pub async fn connect(redis_url: &str) -> Result<Self, StatsCacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| StatsCacheError::backend(err.to_string()))?;
        let pool = bb8::Pool::builder()
            .connection_timeout(Duration::from_secs(2))
            .build(manager)
            .await
            .map_err(|err| StatsCacheError::backend(err.to_string()))?;
        Ok(Self {
            pool,
            breaker: Mutex::new(BreakerState::default()),
        })
    }

    fn lock_breaker(&self) -> std::sync::MutexGuard<'_, BreakerState> {
        match self.breaker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn cooling(&self) -> bool {
        self.lock_breaker().is_cooling(Instant::now())
    }

    fn note_failure(&self) {
        let mut breaker = self.lock_breaker();
        breaker.record_failure(Instant::now());
        if breaker.cooling_until.is_some() {
            warn!(
                cooldown_secs = COOLDOWN.as_secs(),
                "redis unavailable, serving cache misses during cooldown"
            );
        }
    }

    fn note_success(&self) {
        self.lock_breaker().record_success();
    }
}

#[async_trait]
impl StatsCache for RedisStatsCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StatsCacheError> {
        if self.cooling() {
            debug!(key, "redis cooldown active, reporting miss");
            return Ok(None);
        }
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(err) => {
                self.note_failure();
                return Err(StatsCacheError::backend(err.to_string()));
            }
        };
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => {
                self.note_success();
                Ok(value)
            }
            Err(err) => {
                self.note_failure();
                Err(StatsCacheError::backend(err.to_string()))
            }
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StatsCacheError> {
        if self.cooling() {
            debug!(key, "redis cooldown active, discarding write");
            return Ok(());
        }
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(err) => {
                self.note_failure();
                return Err(StatsCacheError::backend(err.to_string()));
            }
        };
        let seconds = ttl.as_secs().max(1);
        match conn.set_ex::<_, _, ()>(key, value, seconds).await {
            Ok(()) => {
                self.note_success();
                Ok(())
            }
            Err(err) => {
                self.note_failure();
                Err(StatsCacheError::backend(err.to_string()))
            }
        }
    }
}
