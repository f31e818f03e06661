//! Driving port for notification use-cases.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Notification, NotificationKind, UserId};

/// Content shared by every notification in one create or broadcast call.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContent {
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Severity category.
    pub kind: NotificationKind,
    /// Optional navigation target.
    pub link: Option<String>,
}

/// Domain use-case port for notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifications: Send + Sync {
    /// Create one notification per target as a single batch, then publish
    /// a live event per created row. An empty target set is a successful
    /// no-op.
    async fn create(
        &self,
        targets: Vec<UserId>,
        content: NotificationContent,
    ) -> Result<Vec<Notification>, Error>;

    /// Notify every user currently holding `role`. Membership is resolved
    /// at call time; zero members degrades to a no-op, not a fault.
    async fn broadcast_by_role(
        &self,
        role: &str,
        content: NotificationContent,
    ) -> Result<Vec<Notification>, Error>;

    /// Notify every user currently granted `permission`; same call-time
    /// resolution semantics as [`Notifications::broadcast_by_role`].
    async fn broadcast_by_permission(
        &self,
        permission: &str,
        content: NotificationContent,
    ) -> Result<Vec<Notification>, Error>;

    /// Most recent 50 notifications for the user, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Notification>, Error>;

    /// Mark a notification read. Idempotent; already-read is a no-op.
    async fn mark_read(&self, notification_id: Uuid) -> Result<(), Error>;

    /// Count of unread notifications for the user.
    async fn unread_count(&self, user_id: UserId) -> Result<u64, Error>;
}
