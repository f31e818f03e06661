//! Port for notification persistence.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{NewNotification, Notification, UserId};

/// Errors raised by notification repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationRepositoryError {
    /// Repository connection could not be established.
    #[error("notification repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("notification repository query failed: {message}")]
    Query { message: String },
}

impl NotificationRepositoryError {
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

/// Port for notification storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist one row per entry as a single batch; returns the stored
    /// rows in input order. An empty batch stores nothing.
    async fn insert_batch(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Most recent notifications for a user, newest first, at most `limit`.
    async fn list_recent(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Set `read = true` on the row. Returns whether an unread row was
    /// updated; marking an already-read or absent row updates nothing.
    async fn mark_read(
        &self,
        notification_id: Uuid,
    ) -> Result<bool, NotificationRepositoryError>;

    /// Count of unread notifications for a user.
    async fn count_unread(&self, user_id: UserId)
    -> Result<u64, NotificationRepositoryError>;
}

/// In-memory repository used by tests and no-database wiring.
#[derive(Debug, Default)]
pub struct FixtureNotificationRepository {
    rows: Mutex<Vec<Notification>>,
}

impl FixtureNotificationRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        match self.rows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Number of stored rows. Test aid.
    pub fn row_count(&self) -> usize {
        self.lock().len()
    }
}

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn insert_batch(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let now = Utc::now();
        let rows: Vec<Notification> = notifications
            .into_iter()
            .map(|entry| Notification {
                id: Uuid::new_v4(),
                user_id: entry.user_id,
                title: entry.title,
                message: entry.message,
                kind: entry.kind,
                link: entry.link,
                read: false,
                created_at: now,
            })
            .collect();
        self.lock().extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn list_recent(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut rows: Vec<Notification> = self
            .lock()
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn mark_read(
        &self,
        notification_id: Uuid,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut rows = self.lock();
        match rows
            .iter_mut()
            .find(|row| row.id == notification_id && !row.read)
        {
            Some(row) => {
                row.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_unread(
        &self,
        user_id: UserId,
    ) -> Result<u64, NotificationRepositoryError> {
        let count = self
            .lock()
            .iter()
            .filter(|row| row.user_id == user_id && !row.read)
            .count();
        Ok(count as u64)
    }
}
