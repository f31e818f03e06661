//! Shared wiring for integration tests: fixture-backed application state
//! and a login route that stamps the requested user id into the session.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use backend::domain::ports::{
    FixtureMessageRepository, FixtureNotificationRepository, FixtureStatsCache,
    FixtureStatsSource, FixtureUserDirectory,
};
use backend::domain::{
    EventBus, MessagingService, NotificationService, StatsService, UserId,
};
use backend::inbound::http::session::SessionContext;
use backend::inbound::http::state::HttpState;

/// Build an `HttpState` over in-memory adapters, seeding the directory
/// with the given `(username, id)` pairs.
pub fn fixture_http_state(users: &[(&str, UserId)]) -> HttpState {
    let bus = Arc::new(EventBus::new());
    let mut directory = FixtureUserDirectory::new();
    for (username, id) in users {
        directory = directory.with_user(*username, *id);
    }
    let directory = Arc::new(directory);

    let messaging = MessagingService::new(
        Arc::clone(&directory),
        Arc::new(FixtureMessageRepository::new()),
        Arc::clone(&bus),
    );
    let notifications = NotificationService::new(
        directory,
        Arc::new(FixtureNotificationRepository::new()),
        Arc::clone(&bus),
    );
    let dashboard = StatsService::new(
        Arc::new(FixtureStatsSource::default()),
        Arc::new(FixtureStatsCache::new()),
    );

    HttpState::new(
        Arc::new(messaging),
        Arc::new(notifications),
        Arc::new(dashboard),
    )
}

/// Session-issuing route for tests. Mount as
/// `.route("/login/{id}", web::get().to(login_route))`.
pub async fn login_route(path: web::Path<String>, session: SessionContext) -> HttpResponse {
    match UserId::new(path.as_str()) {
        Ok(user_id) => match session.persist_user(user_id) {
            Ok(()) => HttpResponse::Ok().finish(),
            Err(_) => HttpResponse::InternalServerError().finish(),
        },
        Err(_) => HttpResponse::BadRequest().finish(),
    }
}
