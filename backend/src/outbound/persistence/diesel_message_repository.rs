//! PostgreSQL-backed `MessageRepository` implementation.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{MessageRepository, MessageRepositoryError};
use crate::domain::{Message, NewMessage, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MessageRow, NewMessageRow};
use super::pool::DbPool;
use super::schema::messages;

/// Diesel-backed implementation of the `MessageRepository` port.
#[derive(Clone)]
pub struct DieselMessageRepository {
    pool: DbPool,
}

impl DieselMessageRepository {
    /// Create a new repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: super::pool::PoolError) -> MessageRepositoryError {
    map_pool_error(error, MessageRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> MessageRepositoryError {
    map_diesel_error(
        error,
        MessageRepositoryError::query,
        MessageRepositoryError::connection,
    )
}

#[async_trait]
impl MessageRepository for DieselMessageRepository {
    async fn insert(&self, message: NewMessage) -> Result<Message, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewMessageRow {
            id: Uuid::new_v4(),
            sender_id: message.sender_id.as_uuid(),
            receiver_id: message.receiver_id.as_uuid(),
            content: message.content,
            attachment_url: message.attachment_url,
            read: false,
            created_at: Utc::now(),
        };
        let stored: MessageRow = diesel::insert_into(messages::table)
            .values(&row)
            .returning(MessageRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(stored.into())
    }

    async fn list_received(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<MessageRow> = messages::table
            .filter(messages::receiver_id.eq(user_id.as_uuid()))
            .order(messages::created_at.desc())
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn list_sent(&self, user_id: UserId) -> Result<Vec<Message>, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<MessageRow> = messages::table
            .filter(messages::sender_id.eq(user_id.as_uuid()))
            .order(messages::created_at.desc())
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn mark_read(
        &self,
        message_id: Uuid,
        receiver_id: UserId,
    ) -> Result<bool, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        // One guarded update; a non-receiver caller matches zero rows and
        // learns nothing about the message's existence.
        let affected = diesel::update(
            messages::table
                .filter(messages::id.eq(message_id))
                .filter(messages::receiver_id.eq(receiver_id.as_uuid())),
        )
        .set(messages::read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(affected > 0)
    }

    async fn count_unread(&self, user_id: UserId) -> Result<u64, MessageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = messages::table
            .filter(messages::receiver_id.eq(user_id.as_uuid()))
            .filter(messages::read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
