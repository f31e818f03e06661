//! Dashboard statistics service.
//!
//! Cache-aside over the authoritative aggregate sources: probe the fast
//! cache, recompute all counts and sums in parallel on a miss, then
//! best-effort repopulate. Staleness up to one TTL window is an accepted
//! tradeoff; nothing invalidates the key on underlying data change.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::domain::cache_aside::fetch_or_compute;
use crate::domain::ports::{DashboardQuery, StatsCache, StatsSource, StatsSourceError};
use crate::domain::{DashboardStats, Error};

/// Fixed cache key for the composite snapshot.
pub const DASHBOARD_CACHE_KEY: &str = "stats:dashboard:v1";

/// Base TTL for the cached snapshot.
pub const DASHBOARD_CACHE_TTL: Duration = Duration::from_secs(60);

/// Upper bound of the random TTL jitter, applied on write so concurrent
/// recomputes do not all expire in the same instant.
const TTL_JITTER_MAX_SECS: u64 = 5;

/// Stats service implementing the dashboard driving port.
#[derive(Clone)]
pub struct StatsService<S, C> {
    source: Arc<S>,
    cache: Arc<C>,
}

impl<S, C> StatsService<S, C> {
    /// Create a new service over the given source and cache.
    pub fn new(source: Arc<S>, cache: Arc<C>) -> Self {
        Self { source, cache }
    }
}

fn map_source_error(error: StatsSourceError) -> Error {
    // Partial-failure policy: any failed computation fails the whole
    // snapshot; the caller retries rather than receiving partial data.
    Error::service_unavailable(format!("dashboard aggregation failed: {error}"))
}

fn jittered_ttl() -> Duration {
    DASHBOARD_CACHE_TTL + Duration::from_secs(rand::thread_rng().gen_range(0..=TTL_JITTER_MAX_SECS))
}

impl<S, C> StatsService<S, C>
where
    S: StatsSource,
    C: StatsCache,
{
    async fn compute(&self) -> Result<DashboardStats, Error> {
        let (properties, agencies, users, active_projects, income, expense, open_tickets, clients) =
            tokio::try_join!(
                self.source.property_counts(),
                self.source.agency_count(),
                self.source.user_count(),
                self.source.active_project_count(),
                self.source.income_cents(),
                self.source.expense_cents(),
                self.source.open_ticket_count(),
                self.source.client_count(),
            )
            .map_err(map_source_error)?;

        debug!("dashboard snapshot recomputed from authoritative store");
        Ok(DashboardStats {
            total_properties: properties.total,
            available_properties: properties.available,
            agencies,
            users,
            active_projects,
            income_cents: income,
            expense_cents: expense,
            balance_cents: income - expense,
            open_tickets,
            clients,
        })
    }
}

#[async_trait]
impl<S, C> DashboardQuery for StatsService<S, C>
where
    S: StatsSource,
    C: StatsCache,
{
    async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        fetch_or_compute(
            self.cache.as_ref(),
            DASHBOARD_CACHE_KEY,
            jittered_ttl(),
            || self.compute(),
        )
        .await
    }
}

#[cfg(test)]
#[path = "stats_service_tests.rs"]
mod tests;
