//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`UserDirectory`], [`MessageRepository`],
//! [`NotificationRepository`], [`StatsSource`], [`StatsCache`]) are
//! implemented by outbound adapters; driving ports ([`Messaging`],
//! [`Notifications`], [`DashboardQuery`]) are implemented by domain
//! services and consumed by inbound adapters. Every port ships a fixture
//! implementation for tests and no-database wiring, plus a `mockall` mock
//! under `#[cfg(test)]`.

mod dashboard_query;
mod message_repository;
mod messaging;
mod notification_repository;
mod notifications;
mod stats_cache;
mod stats_source;
mod user_directory;

#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::DashboardQuery;
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{
    FixtureMessageRepository, MessageRepository, MessageRepositoryError,
};
#[cfg(test)]
pub use messaging::MockMessaging;
pub use messaging::{MessageHistory, Messaging, SendMessageRequest};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
#[cfg(test)]
pub use notifications::MockNotifications;
pub use notifications::{NotificationContent, Notifications};
#[cfg(test)]
pub use stats_cache::MockStatsCache;
pub use stats_cache::{FixtureStatsCache, StatsCache, StatsCacheError};
#[cfg(test)]
pub use stats_source::MockStatsSource;
pub use stats_source::{FixtureStatsSource, PropertyCounts, StatsSource, StatsSourceError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
