//! Notification domain service.
//!
//! Implements the [`Notifications`] driving port. Broadcast variants
//! resolve role/permission membership at call time and reuse the batch
//! create path; live events are published only after the batch commits.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::events::{BusEvent, EventBus, Topic};
use crate::domain::ports::{
    NotificationContent, NotificationRepository, NotificationRepositoryError, Notifications,
    UserDirectory, UserDirectoryError,
};
use crate::domain::{Error, NewNotification, Notification, UserId};

/// Most-recent window served by [`Notifications::list_for_user`].
const LIST_LIMIT: i64 = 50;

/// Notification service implementing the driving port.
#[derive(Clone)]
pub struct NotificationService<D, R> {
    directory: Arc<D>,
    notifications: Arc<R>,
    bus: Arc<EventBus>,
}

impl<D, R> NotificationService<D, R> {
    /// Create a new service over the given ports and bus.
    pub fn new(directory: Arc<D>, notifications: Arc<R>, bus: Arc<EventBus>) -> Self {
        Self {
            directory,
            notifications,
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

fn map_repository_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

impl<D, R> NotificationService<D, R>
where
    D: UserDirectory,
    R: NotificationRepository,
{
    fn publish_created(&self, rows: &[Notification]) {
        for row in rows {
            self.bus.publish(
                Topic::Notification,
                &BusEvent::Notification(Arc::new(row.clone())),
            );
        }
    }
}

#[async_trait]
impl<D, R> Notifications for NotificationService<D, R>
where
    D: UserDirectory,
    R: NotificationRepository,
{
    async fn create(
        &self,
        targets: Vec<UserId>,
        content: NotificationContent,
    ) -> Result<Vec<Notification>, Error> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }
        let batch: Vec<NewNotification> = targets
            .into_iter()
            .map(|user_id| NewNotification {
                user_id,
                title: content.title.clone(),
                message: content.message.clone(),
                kind: content.kind,
                link: content.link.clone(),
            })
            .collect();
        let stored = self
            .notifications
            .insert_batch(batch)
            .await
            .map_err(map_repository_error)?;
        debug!(rows = stored.len(), "notification batch persisted");
        self.publish_created(&stored);
        Ok(stored)
    }

    async fn broadcast_by_role(
        &self,
        role: &str,
        content: NotificationContent,
    ) -> Result<Vec<Notification>, Error> {
        let members = self
            .directory
            .members_with_role(role)
            .await
            .map_err(map_directory_error)?;
        if members.is_empty() {
            debug!(role, "broadcast target role has no members");
        }
        self.create(members, content).await
    }

    async fn broadcast_by_permission(
        &self,
        permission: &str,
        content: NotificationContent,
    ) -> Result<Vec<Notification>, Error> {
        let members = self
            .directory
            .members_with_permission(permission)
            .await
            .map_err(map_directory_error)?;
        if members.is_empty() {
            debug!(permission, "broadcast target permission has no members");
        }
        self.create(members, content).await
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list_recent(user_id, LIST_LIMIT)
            .await
            .map_err(map_repository_error)
    }

    async fn mark_read(&self, notification_id: Uuid) -> Result<(), Error> {
        // Already-read and freshly-marked both succeed; the flag only ever
        // moves towards read.
        let _updated = self
            .notifications
            .mark_read(notification_id)
            .await
            .map_err(map_repository_error)?;
        Ok(())
    }

    async fn unread_count(&self, user_id: UserId) -> Result<u64, Error> {
        self.notifications
            .count_unread(user_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
