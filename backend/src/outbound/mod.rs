//! Outbound adapters: PostgreSQL persistence and the Redis cache.

pub mod cache;
pub mod persistence;
