//! Direct message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// A direct message between two users.
///
/// Immutable once persisted except for the `read` flag, which the receiver
/// may flip through [`crate::domain::ports::Messaging::mark_read`]. The
/// same payload shape travels over the event bus to live streams, so it
/// carries both participant ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Primary key assigned by the repository.
    pub id: Uuid,
    /// Author of the message.
    pub sender_id: UserId,
    /// Addressee of the message.
    pub receiver_id: UserId,
    /// Message body.
    pub content: String,
    /// Optional attachment location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    /// Whether the receiver has read the message.
    pub read: bool,
    /// Persistence timestamp; listing orders on this, newest first.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a message; the repository assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub attachment_url: Option<String>,
}
