//! PostgreSQL-backed `NotificationRepository` implementation.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{NewNotification, Notification, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow, kind_to_str};
use super::pool::DbPool;
use super::schema::notifications;

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: super::pool::PoolError) -> NotificationRepositoryError {
    map_pool_error(error, NotificationRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_diesel_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert_batch(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        if notifications.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let now = Utc::now();
        let rows: Vec<NewNotificationRow> = notifications
            .into_iter()
            .map(|entry| NewNotificationRow {
                id: Uuid::new_v4(),
                user_id: entry.user_id.as_uuid(),
                title: entry.title,
                message: entry.message,
                kind: kind_to_str(entry.kind).to_owned(),
                link: entry.link,
                read: false,
                created_at: now,
            })
            .collect();
        let stored: Vec<NotificationRow> = diesel::insert_into(notifications::table)
            .values(&rows)
            .returning(NotificationRow::as_returning())
            .get_results(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(stored.into_iter().map(Notification::from).collect())
    }

    async fn list_recent(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .order(notifications::created_at.desc())
            .limit(limit)
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn mark_read(
        &self,
        notification_id: Uuid,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let affected = diesel::update(
            notifications::table
                .filter(notifications::id.eq(notification_id))
                .filter(notifications::read.eq(false)),
        )
        .set(notifications::read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(affected > 0)
    }

    async fn count_unread(
        &self,
        user_id: UserId,
    ) -> Result<u64, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = notifications::table
            .filter(notifications::user_id.eq(user_id.as_uuid()))
            .filter(notifications::read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
