//! Shared helpers for HTTP adapter tests.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{HttpResponse, web};

use crate::domain::UserId;
use crate::inbound::http::session::SessionContext;

/// Cookie session middleware with test-friendly settings (no TLS, lax
/// same-site, throwaway key).
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_secure(false)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Test-only login route: persists the path user id into the session so a
/// follow-up request can present the returned cookie.
///
/// Mount as `.route("/test-login/{id}", web::get().to(issue_session))`.
pub async fn issue_session(
    path: web::Path<String>,
    session: SessionContext,
) -> HttpResponse {
    match UserId::new(path.as_str()) {
        Ok(user_id) => match session.persist_user(user_id) {
            Ok(()) => HttpResponse::Ok().finish(),
            Err(_) => HttpResponse::InternalServerError().finish(),
        },
        Err(_) => HttpResponse::BadRequest().finish(),
    }
}
