//! PostgreSQL-backed `StatsSource` implementation.
//!
//! Each method runs one aggregate query; the aggregator fans them out in
//! parallel, so every call checks out its own connection.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PropertyCounts, StatsSource, StatsSourceError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::{agencies, clients, projects, properties, support_tickets, transactions, users};

/// Diesel-backed implementation of the `StatsSource` port.
#[derive(Clone)]
pub struct DieselStatsSource {
    pool: DbPool,
}

impl DieselStatsSource {
    /// Create a new source backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn summed_cents(&self, kind: &str) -> Result<i64, StatsSourceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        // SUM over Int8 comes back as NUMERIC through the query builder;
        // a raw aggregate keeps the result an i64.
        transactions::table
            .filter(transactions::kind.eq(kind))
            .select(diesel::dsl::sql::<BigInt>("COALESCE(SUM(amount_cents), 0)"))
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)
    }
}

fn pool_error(error: super::pool::PoolError) -> StatsSourceError {
    map_pool_error(error, StatsSourceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> StatsSourceError {
    map_diesel_error(error, StatsSourceError::query, StatsSourceError::connection)
}

fn to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[async_trait]
impl StatsSource for DieselStatsSource {
    async fn property_counts(&self) -> Result<PropertyCounts, StatsSourceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 = properties::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let available: i64 = properties::table
            .filter(properties::status.eq("available"))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(PropertyCounts {
            total: to_u64(total),
            available: to_u64(available),
        })
    }

    async fn agency_count(&self) -> Result<u64, StatsSourceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = agencies::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(to_u64(count))
    }

    async fn user_count(&self) -> Result<u64, StatsSourceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(to_u64(count))
    }

    async fn active_project_count(&self) -> Result<u64, StatsSourceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = projects::table
            .filter(projects::status.eq("active"))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(to_u64(count))
    }

    async fn income_cents(&self) -> Result<i64, StatsSourceError> {
        self.summed_cents("income").await
    }

    async fn expense_cents(&self) -> Result<i64, StatsSourceError> {
        self.summed_cents("expense").await
    }

    async fn open_ticket_count(&self) -> Result<u64, StatsSourceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = support_tickets::table
            .filter(support_tickets::status.eq("open"))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(to_u64(count))
    }

    async fn client_count(&self) -> Result<u64, StatsSourceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let count: i64 = clients::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(to_u64(count))
    }
}
