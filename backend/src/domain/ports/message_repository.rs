//! Port for direct message persistence.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Message, NewMessage, UserId};

/// Errors raised by message repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageRepositoryError {
    /// Repository connection could not be established.
    #[error("message repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("message repository query failed: {message}")]
    Query { message: String },
}

impl MessageRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for message storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message with `read = false`; returns the stored row.
    async fn insert(&self, message: NewMessage) -> Result<Message, MessageRepositoryError>;

    /// Messages addressed to `user_id`, newest first.
    async fn list_received(&self, user_id: UserId)
    -> Result<Vec<Message>, MessageRepositoryError>;

    /// Messages authored by `user_id`, newest first.
    async fn list_sent(&self, user_id: UserId) -> Result<Vec<Message>, MessageRepositoryError>;

    /// Set `read = true` on the message iff it exists and is addressed to
    /// `receiver_id`. Returns whether a row matched; callers must not be
    /// able to distinguish "absent" from "not the receiver".
    async fn mark_read(
        &self,
        message_id: Uuid,
        receiver_id: UserId,
    ) -> Result<bool, MessageRepositoryError>;

    /// Count of unread messages addressed to `user_id`.
    async fn count_unread(&self, user_id: UserId) -> Result<u64, MessageRepositoryError>;
}

/// In-memory repository used by tests and no-database wiring.
#[derive(Debug, Default)]
pub struct FixtureMessageRepository {
    rows: Mutex<Vec<Message>>,
}

impl FixtureMessageRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Message>> {
        match self.rows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl MessageRepository for FixtureMessageRepository {
    async fn insert(&self, message: NewMessage) -> Result<Message, MessageRepositoryError> {
        let row = Message {
            id: Uuid::new_v4(),
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            attachment_url: message.attachment_url,
            read: false,
            created_at: Utc::now(),
        };
        self.lock().push(row.clone());
        Ok(row)
    }

    async fn list_received(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut rows: Vec<Message> = self
            .lock()
            .iter()
            .filter(|row| row.receiver_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_sent(&self, user_id: UserId) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut rows: Vec<Message> = self
            .lock()
            .iter()
            .filter(|row| row.sender_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn mark_read(
        &self,
        message_id: Uuid,
        receiver_id: UserId,
    ) -> Result<bool, MessageRepositoryError> {
        let mut rows = self.lock();
        match rows
            .iter_mut()
            .find(|row| row.id == message_id && row.receiver_id == receiver_id)
        {
            Some(row) => {
                row.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_unread(&self, user_id: UserId) -> Result<u64, MessageRepositoryError> {
        let count = self
            .lock()
            .iter()
            .filter(|row| row.receiver_id == user_id && !row.read)
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_message(sender: UserId, receiver: UserId, content: &str) -> NewMessage {
        NewMessage {
            sender_id: sender,
            receiver_id: receiver,
            content: content.to_owned(),
            attachment_url: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_starts_unread() {
        let repo = FixtureMessageRepository::new();
        let stored = repo
            .insert(new_message(UserId::random(), UserId::random(), "hi"))
            .await
            .expect("insert");
        assert!(!stored.read);
    }

    #[tokio::test]
    async fn mark_read_requires_matching_receiver() {
        let repo = FixtureMessageRepository::new();
        let receiver = UserId::random();
        let stored = repo
            .insert(new_message(UserId::random(), receiver, "hi"))
            .await
            .expect("insert");

        let wrong_caller = repo
            .mark_read(stored.id, UserId::random())
            .await
            .expect("mark");
        assert!(!wrong_caller);
        assert_eq!(repo.count_unread(receiver).await.expect("count"), 1);

        let matched = repo.mark_read(stored.id, receiver).await.expect("mark");
        assert!(matched);
        assert_eq!(repo.count_unread(receiver).await.expect("count"), 0);
    }
}
