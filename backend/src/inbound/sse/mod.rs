//! Server-sent events gateway.
//!
//! `GET /api/v1/events` upgrades an authenticated request into a long-lived
//! `text/event-stream` response fed from the in-process event bus. Frames
//! carry the same JSON shapes the REST handlers return, under the event
//! names `message` and `notification`.

pub mod stream;

use actix_web::{HttpResponse, get, http::header, web};

use crate::domain::EventBus;
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::session::SessionContext;

pub use stream::EventStream;

/// Open the caller's live event stream.
#[get("/events")]
pub async fn events(bus: web::Data<EventBus>, session: SessionContext) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let stream = EventStream::for_user(bus.into_inner(), user_id);
    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(stream))
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
