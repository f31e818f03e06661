//! Inbound adapters translating transport requests into domain calls.

pub mod http;
pub mod sse;
