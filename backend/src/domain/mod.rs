//! Domain core: models, services, the event bus, and ports.
//!
//! Everything here is transport agnostic. Inbound adapters translate HTTP
//! and stream concerns into port calls; outbound adapters implement the
//! driven ports against PostgreSQL and Redis. The event bus is the only
//! piece of shared mutable state and is injected, never ambient.

pub mod cache_aside;
pub mod error;
pub mod events;
pub mod message;
mod messaging_service;
pub mod notification;
mod notification_service;
pub mod ports;
pub mod stats;
mod stats_service;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::events::{BusEvent, EventBus, Predicate, SubscriptionId, Topic};
pub use self::message::{Message, NewMessage};
pub use self::messaging_service::MessagingService;
pub use self::notification::{NewNotification, Notification, NotificationKind};
pub use self::notification_service::NotificationService;
pub use self::stats::DashboardStats;
pub use self::stats_service::{DASHBOARD_CACHE_KEY, DASHBOARD_CACHE_TTL, StatsService};
pub use self::user::{UserId, UserIdValidationError};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
