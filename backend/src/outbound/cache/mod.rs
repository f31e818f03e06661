//! Redis cache adapter for the stats snapshot.

pub mod redis_stats_cache;

pub use redis_stats_cache::RedisStatsCache;
