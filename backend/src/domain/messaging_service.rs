//! Direct messaging domain service.
//!
//! Implements the [`Messaging`] driving port over the user directory and
//! message repository ports, publishing to the event bus after each
//! committed send. The publish always happens after the repository write
//! returns, so no live event ever refers to a failed write.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::events::{BusEvent, EventBus, Topic};
use crate::domain::ports::{
    MessageHistory, MessageRepository, MessageRepositoryError, Messaging, SendMessageRequest,
    UserDirectory, UserDirectoryError,
};
use crate::domain::{Error, Message, NewMessage, UserId};

/// Messaging service implementing the driving port.
#[derive(Clone)]
pub struct MessagingService<D, R> {
    directory: Arc<D>,
    messages: Arc<R>,
    bus: Arc<EventBus>,
}

impl<D, R> MessagingService<D, R> {
    /// Create a new service over the given ports and bus.
    pub fn new(directory: Arc<D>, messages: Arc<R>, bus: Arc<EventBus>) -> Self {
        Self {
            directory,
            messages,
            bus,
        }
    }
}

fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

fn map_repository_error(error: MessageRepositoryError) -> Error {
    match error {
        MessageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("message repository unavailable: {message}"))
        }
        MessageRepositoryError::Query { message } => {
            Error::internal(format!("message repository error: {message}"))
        }
    }
}

#[async_trait]
impl<D, R> Messaging for MessagingService<D, R>
where
    D: UserDirectory,
    R: MessageRepository,
{
    async fn send(&self, request: SendMessageRequest) -> Result<Message, Error> {
        let receiver_id = self
            .directory
            .resolve_username(&request.receiver_username)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found("recipient username does not resolve"))?;

        let stored = self
            .messages
            .insert(NewMessage {
                sender_id: request.sender_id,
                receiver_id,
                content: request.content,
                attachment_url: request.attachment_url,
            })
            .await
            .map_err(map_repository_error)?;

        debug!(message_id = %stored.id, receiver = %receiver_id, "message persisted");
        self.bus
            .publish(Topic::Message, &BusEvent::Message(Arc::new(stored.clone())));
        Ok(stored)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<MessageHistory, Error> {
        // Both directions fetched independently; sender != receiver means a
        // message appears in exactly one of the two.
        let received = self
            .messages
            .list_received(user_id)
            .await
            .map_err(map_repository_error)?;
        let sent = self
            .messages
            .list_sent(user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(MessageHistory { received, sent })
    }

    async fn mark_read(&self, message_id: Uuid, user_id: UserId) -> Result<(), Error> {
        let matched = self
            .messages
            .mark_read(message_id, user_id)
            .await
            .map_err(map_repository_error)?;
        if matched {
            Ok(())
        } else {
            // Absent and not-the-receiver answer identically.
            Err(Error::not_found("message not found"))
        }
    }

    async fn unread_count(&self, user_id: UserId) -> Result<u64, Error> {
        self.messages
            .count_unread(user_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "messaging_service_tests.rs"]
mod tests;
