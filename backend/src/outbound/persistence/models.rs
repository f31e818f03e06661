//! Row structs bridging Diesel queries and domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Message, Notification, NotificationKind, UserId};

use super::schema::{messages, notifications};

/// A persisted message row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub attachment_url: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            sender_id: UserId::from_uuid(row.sender_id),
            receiver_id: UserId::from_uuid(row.receiver_id),
            content: row.content,
            attachment_url: row.attachment_url,
            read: row.read,
            created_at: row.created_at,
        }
    }
}

/// Insertable message row; ids and timestamps are assigned by the adapter
/// so the returned row equals what was stored.
#[derive(Debug, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessageRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub attachment_url: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A persisted notification row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub link: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        let kind = parse_kind(&row.kind, row.id);
        Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            title: row.title,
            message: row.message,
            kind,
            link: row.link,
            read: row.read,
            created_at: row.created_at,
        }
    }
}

/// Insertable notification row.
#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub link: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Stored string for a notification kind.
pub fn kind_to_str(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "info",
        NotificationKind::Success => "success",
        NotificationKind::Warning => "warning",
        NotificationKind::Error => "error",
    }
}

fn parse_kind(value: &str, row_id: Uuid) -> NotificationKind {
    match value {
        "info" => NotificationKind::Info,
        "success" => NotificationKind::Success,
        "warning" => NotificationKind::Warning,
        "error" => NotificationKind::Error,
        other => {
            tracing::warn!(
                value = other,
                notification_id = %row_id,
                "unrecognised notification kind, defaulting to info"
            );
            NotificationKind::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("info", NotificationKind::Info)]
    #[case("success", NotificationKind::Success)]
    #[case("warning", NotificationKind::Warning)]
    #[case("error", NotificationKind::Error)]
    #[case("unknown", NotificationKind::Info)]
    fn kind_parsing(#[case] stored: &str, #[case] expected: NotificationKind) {
        assert_eq!(parse_kind(stored, Uuid::new_v4()), expected);
    }

    #[rstest]
    #[case(NotificationKind::Info, "info")]
    #[case(NotificationKind::Error, "error")]
    fn kind_storage(#[case] kind: NotificationKind, #[case] expected: &str) {
        assert_eq!(kind_to_str(kind), expected);
    }
}
