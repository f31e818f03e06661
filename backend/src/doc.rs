//! OpenAPI documentation configuration.
//!
//! Generates the specification served by Swagger UI in debug builds. The
//! `/api/v1/events` stream stays outside the document: it holds the
//! connection open with `text/event-stream` frames, which OpenAPI cannot
//! describe usefully.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{DashboardStats, ErrorCode, Message, Notification, NotificationKind};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::messages::{
    MessageHistoryResponse, SendMessageBody, UnreadCountResponse,
};
use crate::inbound::http::notifications::NotificationListResponse;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the authenticated user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Ops platform realtime API",
        description = "Messaging, notifications, dashboard statistics, and the live event stream."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::messages::send_message,
        crate::inbound::http::messages::list_messages,
        crate::inbound::http::messages::mark_message_read,
        crate::inbound::http::messages::unread_message_count,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_notification_read,
        crate::inbound::http::notifications::unread_notification_count,
        crate::inbound::http::stats::dashboard_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        Message,
        MessageHistoryResponse,
        SendMessageBody,
        UnreadCountResponse,
        Notification,
        NotificationKind,
        NotificationListResponse,
        DashboardStats,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/v1/messages",
            "/api/v1/messages/{id}/read",
            "/api/v1/messages/unread-count",
            "/api/v1/notifications",
            "/api/v1/notifications/{id}/read",
            "/api/v1/notifications/unread-count",
            "/api/v1/dashboard/stats",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }
}
