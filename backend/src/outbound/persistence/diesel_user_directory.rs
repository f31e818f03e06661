//! PostgreSQL-backed `UserDirectory` implementation.
//!
//! Resolves usernames and role or permission membership at call time, so
//! broadcasts always target the current membership rather than a cached
//! snapshot.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::ports::{UserDirectory, UserDirectoryError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::{role_permissions, user_roles, users};

/// Diesel-backed implementation of the `UserDirectory` port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: super::pool::PoolError) -> UserDirectoryError {
    map_pool_error(error, UserDirectoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    map_diesel_error(
        error,
        UserDirectoryError::query,
        UserDirectoryError::connection,
    )
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn resolve_username(
        &self,
        username: &str,
    ) -> Result<Option<UserId>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let id: Option<Uuid> = users::table
            .filter(users::username.eq(username))
            .select(users::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(id.map(UserId::from_uuid))
    }

    async fn members_with_role(&self, role: &str) -> Result<Vec<UserId>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<Uuid> = user_roles::table
            .filter(user_roles::role.eq(role))
            .select(user_roles::user_id)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn members_with_permission(
        &self,
        permission: &str,
    ) -> Result<Vec<UserId>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        // Two round trips keeps the query planner honest and the Diesel
        // types simple; membership sets are small.
        let roles: Vec<String> = role_permissions::table
            .filter(role_permissions::permission.eq(permission))
            .select(role_permissions::role)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        if roles.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = user_roles::table
            .filter(user_roles::role.eq_any(&roles))
            .select(user_roles::user_id)
            .distinct()
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }
}
