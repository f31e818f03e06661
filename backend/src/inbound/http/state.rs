//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` so they only depend on
//! domain driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{DashboardQuery, Messaging, Notifications};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Direct messaging use-cases.
    pub messaging: Arc<dyn Messaging>,
    /// Notification use-cases.
    pub notifications: Arc<dyn Notifications>,
    /// Dashboard statistics read.
    pub dashboard: Arc<dyn DashboardQuery>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(
        messaging: Arc<dyn Messaging>,
        notifications: Arc<dyn Notifications>,
        dashboard: Arc<dyn DashboardQuery>,
    ) -> Self {
        Self {
            messaging,
            notifications,
            dashboard,
        }
    }
}
