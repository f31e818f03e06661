//! Driving port for the dashboard statistics read.

use async_trait::async_trait;

use crate::domain::{DashboardStats, Error};

/// Domain use-case port for the composite dashboard snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Return a complete snapshot, serving from the fast cache when
    /// possible and recomputing from the authoritative store otherwise.
    /// Never returns a partial snapshot: any underlying failure surfaces
    /// as a retryable error instead.
    async fn dashboard_stats(&self) -> Result<DashboardStats, Error>;
}
