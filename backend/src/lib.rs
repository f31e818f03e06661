//! Real-time messaging, notifications, and dashboard statistics for the
//! internal operations platform.
//!
//! The crate follows a hexagonal layout: `domain` holds the core services
//! and ports, `inbound` the HTTP and server-sent-event adapters, and
//! `outbound` the PostgreSQL and Redis adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
