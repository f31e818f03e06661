//! Notification model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// Severity/styling category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A per-user notification row.
///
/// Created singly or as a batch fan-out to many target users; immutable
/// except for the `read` flag, whose mark-read transition is idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Primary key assigned by the repository.
    pub id: Uuid,
    /// The user this notification is addressed to.
    pub user_id: UserId,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Severity category.
    pub kind: NotificationKind,
    /// Optional navigation target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Whether the user has read the notification.
    pub read: bool,
    /// Persistence timestamp; listing orders on this, newest first.
    pub created_at: DateTime<Utc>,
}

/// Payload for one notification row; the repository assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub link: Option<String>,
}
