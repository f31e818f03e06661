//! PostgreSQL persistence adapters implementing the domain ports.

pub mod diesel_error_mapping;
pub mod diesel_message_repository;
pub mod diesel_notification_repository;
pub mod diesel_stats_source;
pub mod diesel_user_directory;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_stats_source::DieselStatsSource;
pub use diesel_user_directory::DieselUserDirectory;
pub use pool::{DbPool, PoolConfig, PoolError};
