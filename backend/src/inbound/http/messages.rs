//! Direct message API handlers.
//!
//! ```text
//! POST /api/v1/messages {"receiverUsername":"bob","content":"Hello"}
//! GET /api/v1/messages
//! POST /api/v1/messages/{id}/read
//! GET /api/v1/messages/unread-count
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Message};
use crate::domain::ports::SendMessageRequest;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/messages`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    /// Recipient addressed by username.
    pub receiver_username: String,
    /// Message body; must not be blank.
    pub content: String,
    /// Optional attachment location.
    pub attachment_url: Option<String>,
}

/// Response body for `GET /api/v1/messages`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageHistoryResponse {
    /// Messages addressed to the caller, newest first.
    pub received: Vec<Message>,
    /// Messages authored by the caller, newest first.
    pub sent: Vec<Message>,
}

/// Response body for unread-count reads.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountResponse {
    /// Number of unread rows.
    pub count: u64,
}

/// Send a direct message to a username.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = SendMessageBody,
    responses(
        (status = 200, description = "Message sent", body = Message),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Recipient not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SendMessageBody>,
) -> ApiResult<web::Json<Message>> {
    let sender_id = session.require_user_id()?;
    let body = payload.into_inner();
    if body.content.trim().is_empty() {
        return Err(Error::invalid_request("message content must not be empty").into());
    }
    let message = state
        .messaging
        .send(SendMessageRequest {
            sender_id,
            receiver_username: body.receiver_username,
            content: body.content,
            attachment_url: body.attachment_url,
        })
        .await?;
    Ok(web::Json(message))
}

/// List the caller's received and sent messages.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    responses(
        (status = 200, description = "Message history", body = MessageHistoryResponse),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["messages"],
    operation_id = "listMessages"
)]
#[get("/messages")]
pub async fn list_messages(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MessageHistoryResponse>> {
    let user_id = session.require_user_id()?;
    let history = state.messaging.list_for_user(user_id).await?;
    Ok(web::Json(MessageHistoryResponse {
        received: history.received,
        sent: history.sent,
    }))
}

/// Mark a received message as read.
#[utoipa::path(
    post,
    path = "/api/v1/messages/{id}/read",
    params(("id" = Uuid, Path, description = "Message id")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 404, description = "Not found or not the receiver", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["messages"],
    operation_id = "markMessageRead"
)]
#[post("/messages/{id}/read")]
pub async fn mark_message_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state
        .messaging
        .mark_read(path.into_inner(), user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Count the caller's unread messages.
#[utoipa::path(
    get,
    path = "/api/v1/messages/unread-count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["messages"],
    operation_id = "unreadMessageCount"
)]
#[get("/messages/unread-count")]
pub async fn unread_message_count(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UnreadCountResponse>> {
    let user_id = session.require_user_id()?;
    let count = state.messaging.unread_count(user_id).await?;
    Ok(web::Json(UnreadCountResponse { count }))
}

#[cfg(test)]
#[path = "messages_tests.rs"]
mod tests;
