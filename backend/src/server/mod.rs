//! Server construction and dependency wiring.
//!
//! Chooses real adapters when a database pool or Redis URL is configured
//! and falls back to the in-memory fixtures otherwise, so the binary runs
//! end to end in development without external services.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{
    DashboardQuery, FixtureMessageRepository, FixtureNotificationRepository, FixtureStatsCache,
    FixtureStatsSource, FixtureUserDirectory, Messaging, Notifications, StatsCache, StatsSource,
};
use crate::domain::{EventBus, MessagingService, NotificationService, StatsService};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::messages::{
    list_messages, mark_message_read, send_message, unread_message_count,
};
use crate::inbound::http::notifications::{
    list_notifications, mark_notification_read, unread_notification_count,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::stats::dashboard_stats;
use crate::inbound::sse::events;
use crate::middleware::Trace;
use crate::outbound::cache::RedisStatsCache;
use crate::outbound::persistence::{
    DieselMessageRepository, DieselNotificationRepository, DieselStatsSource, DieselUserDirectory,
};

fn dashboard_over<S, C>(source: S, cache: C) -> Arc<dyn DashboardQuery>
where
    S: StatsSource + 'static,
    C: StatsCache + 'static,
{
    Arc::new(StatsService::new(Arc::new(source), Arc::new(cache)))
}

/// Wired application dependencies shared across workers.
pub struct AppState {
    /// Event bus feeding the live stream.
    pub bus: Arc<EventBus>,
    /// Driving ports behind the HTTP handlers.
    pub http: HttpState,
}

/// Build the application state from configuration.
///
/// A missing pool swaps in fixture persistence; a missing or unreachable
/// Redis swaps in the in-process cache. Both degradations are logged.
pub async fn build_app_state(config: &ServerConfig) -> AppState {
    let bus = Arc::new(EventBus::new());

    let (messaging, notifications): (Arc<dyn Messaging>, Arc<dyn Notifications>) =
        match config.db_pool.clone() {
            Some(pool) => {
                let directory = Arc::new(DieselUserDirectory::new(pool.clone()));
                let messaging = MessagingService::new(
                    Arc::clone(&directory),
                    Arc::new(DieselMessageRepository::new(pool.clone())),
                    Arc::clone(&bus),
                );
                let notifications = NotificationService::new(
                    directory,
                    Arc::new(DieselNotificationRepository::new(pool)),
                    Arc::clone(&bus),
                );
                (Arc::new(messaging), Arc::new(notifications))
            }
            None => {
                info!("no database configured, using in-memory fixture persistence");
                let directory = Arc::new(FixtureUserDirectory::new());
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
                (Arc::new(messaging), Arc::new(notifications))
            }
        };

    let redis = match config.redis_url.as_deref() {
        Some(url) => match RedisStatsCache::connect(url).await {
            Ok(cache) => Some(cache),
            Err(error) => {
                tracing::warn!(%error, "redis unavailable at startup, caching in process memory");
                None
            }
        },
        None => None,
    };

    let dashboard: Arc<dyn DashboardQuery> = match (config.db_pool.clone(), redis) {
        (Some(pool), Some(cache)) => dashboard_over(DieselStatsSource::new(pool), cache),
        (Some(pool), None) => {
            dashboard_over(DieselStatsSource::new(pool), FixtureStatsCache::new())
        }
        (None, Some(cache)) => dashboard_over(FixtureStatsSource::default(), cache),
        (None, None) => {
            dashboard_over(FixtureStatsSource::default(), FixtureStatsCache::new())
        }
    };

    AppState {
        bus,
        http: HttpState::new(messaging, notifications, dashboard),
    }
}

/// Create the HTTP server bound to the configured address.
///
/// # Errors
///
/// Returns an I/O error when the bind address is unavailable.
pub fn create_server(
    config: ServerConfig,
    state: AppState,
    health: web::Data<HealthState>,
) -> std::io::Result<Server> {
    let key = config.key.clone();
    let cookie_secure = config.cookie_secure;
    let same_site = config.same_site;
    let http_state = web::Data::new(state.http);
    let bus = web::Data::from(state.bus);

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(same_site)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .app_data(http_state.clone())
            .app_data(bus.clone())
            .service(send_message)
            .service(list_messages)
            .service(mark_message_read)
            .service(unread_message_count)
            .service(list_notifications)
            .service(mark_notification_read)
            .service(unread_notification_count)
            .service(dashboard_stats)
            .service(events);

        let mut app = App::new()
            .app_data(health.clone())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app.service(
                SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
        }

        app
    })
    .bind(config.bind_addr)?;

    Ok(server.run())
}
