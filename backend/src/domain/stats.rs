//! Dashboard statistics snapshot.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Composite dashboard snapshot.
///
/// Derived and non-authoritative: always recomputed as a whole and
/// replaced atomically per cache TTL window, never independently mutated.
/// Monetary sums are integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// All property rows.
    pub total_properties: u64,
    /// Properties currently marked available.
    pub available_properties: u64,
    /// Number of agencies.
    pub agencies: u64,
    /// Number of registered users.
    pub users: u64,
    /// Projects in an active state.
    pub active_projects: u64,
    /// Income transaction sum, cents.
    pub income_cents: i64,
    /// Expense transaction sum, cents.
    pub expense_cents: i64,
    /// `income_cents - expense_cents`.
    pub balance_cents: i64,
    /// Support tickets still open.
    pub open_tickets: u64,
    /// Number of clients.
    pub clients: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let stats = DashboardStats {
            total_properties: 12,
            available_properties: 5,
            agencies: 2,
            users: 9,
            active_projects: 3,
            income_cents: 1_250_000,
            expense_cents: 480_000,
            balance_cents: 770_000,
            open_tickets: 4,
            clients: 7,
        };
        let raw = serde_json::to_string(&stats).expect("serializable");
        assert!(raw.contains("\"totalProperties\":12"));
        let back: DashboardStats = serde_json::from_str(&raw).expect("deserializable");
        assert_eq!(back, stats);
    }
}
