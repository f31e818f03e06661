//! Driving port for direct messaging use-cases.
//!
//! Inbound adapters (HTTP handlers) depend on this port; the domain
//! service implements it. Tests substitute a mock.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Message, UserId};

/// Request payload for sending a message.
#[derive(Debug, Clone, PartialEq)]
pub struct SendMessageRequest {
    /// Authenticated author.
    pub sender_id: UserId,
    /// Recipient addressed by username, resolved at send time.
    pub receiver_username: String,
    /// Message body.
    pub content: String,
    /// Optional attachment location.
    pub attachment_url: Option<String>,
}

/// Both directions of a user's message history, each newest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageHistory {
    /// Messages addressed to the user.
    pub received: Vec<Message>,
    /// Messages authored by the user.
    pub sent: Vec<Message>,
}

/// Domain use-case port for direct messaging.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messaging: Send + Sync {
    /// Send a message: resolve the recipient, persist, then publish the
    /// live event. Fails with a not-found error when the username does
    /// not resolve; no event is published when persistence fails.
    async fn send(&self, request: SendMessageRequest) -> Result<Message, Error>;

    /// Fetch received and sent history for a user.
    async fn list_for_user(&self, user_id: UserId) -> Result<MessageHistory, Error>;

    /// Mark a message read on behalf of its receiver. Absent messages and
    /// messages addressed to someone else fail identically with a
    /// not-found error so existence is never leaked.
    async fn mark_read(&self, message_id: Uuid, user_id: UserId) -> Result<(), Error>;

    /// Count of unread messages addressed to the user.
    async fn unread_count(&self, user_id: UserId) -> Result<u64, Error>;
}
