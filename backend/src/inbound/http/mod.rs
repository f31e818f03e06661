//! HTTP adapter: REST handlers, session helpers, and error envelopes.

pub mod error;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod session;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiError, ApiResult};
pub use session::SessionContext;
pub use state::HttpState;
