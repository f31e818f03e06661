//! Port for the authoritative aggregate source data.
//!
//! One async method per independent count/sum so the aggregator can fan
//! them out in parallel. Implementations read the aggregate source tables;
//! the core never writes them.

use async_trait::async_trait;

/// Errors raised by stats source adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsSourceError {
    /// Source connection could not be established.
    #[error("stats source connection failed: {message}")]
    Connection { message: String },
    /// Count or sum query failed during execution.
    #[error("stats source query failed: {message}")]
    Query { message: String },
}

impl StatsSourceError {
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

/// Property totals returned as one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyCounts {
    /// All property rows.
    pub total: u64,
    /// Properties currently marked available.
    pub available: u64,
}

/// Port over the authoritative store's aggregate source tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Total and available property counts.
    async fn property_counts(&self) -> Result<PropertyCounts, StatsSourceError>;

    /// Number of agencies.
    async fn agency_count(&self) -> Result<u64, StatsSourceError>;

    /// Number of registered users.
    async fn user_count(&self) -> Result<u64, StatsSourceError>;

    /// Number of projects in an active state.
    async fn active_project_count(&self) -> Result<u64, StatsSourceError>;

    /// Sum of income transactions, in cents.
    async fn income_cents(&self) -> Result<i64, StatsSourceError>;

    /// Sum of expense transactions, in cents.
    async fn expense_cents(&self) -> Result<i64, StatsSourceError>;

    /// Number of support tickets still open.
    async fn open_ticket_count(&self) -> Result<u64, StatsSourceError>;

    /// Number of clients.
    async fn client_count(&self) -> Result<u64, StatsSourceError>;
}

/// Deterministic source used by tests and no-database wiring.
#[derive(Debug, Clone, Copy)]
pub struct FixtureStatsSource {
    /// Property totals served by every call.
    pub properties: PropertyCounts,
    /// Agency count served by every call.
    pub agencies: u64,
    /// User count served by every call.
    pub users: u64,
    /// Active project count served by every call.
    pub active_projects: u64,
    /// Income sum served by every call.
    pub income_cents: i64,
    /// Expense sum served by every call.
    pub expense_cents: i64,
    /// Open ticket count served by every call.
    pub open_tickets: u64,
    /// Client count served by every call.
    pub clients: u64,
}

impl Default for FixtureStatsSource {
    fn default() -> Self {
        Self {
            properties: PropertyCounts {
                total: 12,
                available: 5,
            },
            agencies: 2,
            users: 9,
            active_projects: 3,
            income_cents: 1_250_000,
            expense_cents: 480_000,
            open_tickets: 4,
            clients: 7,
        }
    }
}

#[async_trait]
impl StatsSource for FixtureStatsSource {
    async fn property_counts(&self) -> Result<PropertyCounts, StatsSourceError> {
        Ok(self.properties)
    }

    async fn agency_count(&self) -> Result<u64, StatsSourceError> {
        Ok(self.agencies)
    }

    async fn user_count(&self) -> Result<u64, StatsSourceError> {
        Ok(self.users)
    }

    async fn active_project_count(&self) -> Result<u64, StatsSourceError> {
        Ok(self.active_projects)
    }

    async fn income_cents(&self) -> Result<i64, StatsSourceError> {
        Ok(self.income_cents)
    }

    async fn expense_cents(&self) -> Result<i64, StatsSourceError> {
        Ok(self.expense_cents)
    }

    async fn open_ticket_count(&self) -> Result<u64, StatsSourceError> {
        Ok(self.open_tickets)
    }

    async fn client_count(&self) -> Result<u64, StatsSourceError> {
        Ok(self.clients)
    }
}
