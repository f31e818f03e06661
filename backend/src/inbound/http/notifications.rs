//! Notification API handlers.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Notification;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::messages::UnreadCountResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Response body for `GET /api/v1/notifications`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationListResponse {
    /// Most recent notifications for the caller, newest first.
    pub notifications: Vec<Notification>,
}

/// List the caller's most recent notifications.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Recent notifications", body = NotificationListResponse),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<NotificationListResponse>> {
    let user_id = session.require_user_id()?;
    let notifications = state.notifications.list_for_user(user_id).await?;
    Ok(web::Json(NotificationListResponse { notifications }))
}

/// Mark a notification as read. Safe to repeat.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    state.notifications.mark_read(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Count the caller's unread notifications.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["notifications"],
    operation_id = "unreadNotificationCount"
)]
#[get("/notifications/unread-count")]
pub async fn unread_notification_count(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UnreadCountResponse>> {
    let user_id = session.require_user_id()?;
    let count = state.notifications.unread_count(user_id).await?;
    Ok(web::Json(UnreadCountResponse { count }))
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
