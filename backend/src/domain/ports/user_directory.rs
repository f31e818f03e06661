//! Port for resolving users, roles, and permissions.
//!
//! The authoritative store owns user records; the core only needs to turn
//! a username into an id and to expand role/permission membership at
//! broadcast time. Membership is resolved at call time with no snapshot
//! guarantee against concurrent role changes; broadcasts are best effort.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::UserId;

/// Errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserDirectoryError {
    /// Directory backend could not be reached.
    #[error("user directory connection failed: {message}")]
    Connection { message: String },
    /// Lookup failed during execution.
    #[error("user directory query failed: {message}")]
    Query { message: String },
}

impl UserDirectoryError {
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

/// Port for user identity lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a username to its user id, `None` when absent.
    async fn resolve_username(&self, username: &str)
    -> Result<Option<UserId>, UserDirectoryError>;

    /// Current member set of a role. Empty membership is not an error.
    async fn members_with_role(&self, role: &str) -> Result<Vec<UserId>, UserDirectoryError>;

    /// Current member set of a permission. Empty membership is not an error.
    async fn members_with_permission(
        &self,
        permission: &str,
    ) -> Result<Vec<UserId>, UserDirectoryError>;
}

/// In-memory directory used by tests and no-database wiring.
#[derive(Debug, Default)]
pub struct FixtureUserDirectory {
    usernames: Mutex<HashMap<String, UserId>>,
    roles: Mutex<HashMap<String, Vec<UserId>>>,
    permissions: Mutex<HashMap<String, Vec<UserId>>>,
}

impl FixtureUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a username → id mapping.
    #[must_use]
    pub fn with_user(self, username: impl Into<String>, id: UserId) -> Self {
        self.lock(&self.usernames).insert(username.into(), id);
        self
    }

    /// Register the member set of a role.
    #[must_use]
    pub fn with_role(self, role: impl Into<String>, members: Vec<UserId>) -> Self {
        self.lock(&self.roles).insert(role.into(), members);
        self
    }

    /// Register the member set of a permission.
    #[must_use]
    pub fn with_permission(self, permission: impl Into<String>, members: Vec<UserId>) -> Self {
        self.lock(&self.permissions).insert(permission.into(), members);
        self
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        match mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn resolve_username(
        &self,
        username: &str,
    ) -> Result<Option<UserId>, UserDirectoryError> {
        Ok(self.lock(&self.usernames).get(username).copied())
    }

    async fn members_with_role(&self, role: &str) -> Result<Vec<UserId>, UserDirectoryError> {
        Ok(self.lock(&self.roles).get(role).cloned().unwrap_or_default())
    }

    async fn members_with_permission(
        &self,
        permission: &str,
    ) -> Result<Vec<UserId>, UserDirectoryError> {
        Ok(self
            .lock(&self.permissions)
            .get(permission)
            .cloned()
            .unwrap_or_default())
    }
}
