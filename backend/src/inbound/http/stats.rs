//! Dashboard statistics handler.

use actix_web::{get, web};

use crate::domain::DashboardStats;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Read the aggregated dashboard snapshot.
///
/// Served from cache when a fresh entry exists; otherwise recomputed from
/// the underlying stores. A 503 means a store was unreachable and the call
/// can be retried.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    responses(
        (status = 200, description = "Aggregated dashboard statistics", body = DashboardStats),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 503, description = "A backing store was unreachable", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["dashboard"],
    operation_id = "dashboardStats"
)]
#[get("/dashboard/stats")]
pub async fn dashboard_stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardStats>> {
    session.require_user_id()?;
    let stats = state.dashboard.dashboard_stats().await?;
    Ok(web::Json(stats))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    use super::*;
    use crate::domain::ports::{MockDashboardQuery, MockMessaging, MockNotifications};
    use crate::domain::{Error, UserId};
    use crate::inbound::http::test_utils::{issue_session, test_session_middleware};

    fn sample_stats() -> DashboardStats {
        DashboardStats {
            total_properties: 12,
            available_properties: 5,
            agencies: 2,
            users: 9,
            active_projects: 3,
            income_cents: 1_250_000,
            expense_cents: 480_000,
            balance_cents: 770_000,
            open_tickets: 4,
            clients: 7,
        }
    }

    fn state_with_dashboard(dashboard: MockDashboardQuery) -> HttpState {
        HttpState::new(
            Arc::new(MockMessaging::new()),
            Arc::new(MockNotifications::new()),
            Arc::new(dashboard),
        )
    }

    async fn app_and_cookie(
        dashboard: MockDashboardQuery,
    ) -> (
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        actix_web::cookie::Cookie<'static>,
    ) {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(state_with_dashboard(dashboard)))
                .route("/test-login/{id}", web::get().to(issue_session))
                .service(web::scope("/api/v1").service(dashboard_stats)),
        )
        .await;

        let login = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/test-login/{}", UserId::random()))
                .to_request(),
        )
        .await;
        let cookie = login
            .response()
            .cookies()
            .next()
            .expect("session cookie issued")
            .into_owned();
        (app, cookie)
    }

    #[actix_web::test]
    async fn returns_the_snapshot() {
        let mut dashboard = MockDashboardQuery::new();
        dashboard
            .expect_dashboard_stats()
            .return_once(|| Ok(sample_stats()));

        let (app, cookie) = app_and_cookie(dashboard).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/dashboard/stats")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: DashboardStats = test::read_body_json(response).await;
        assert_eq!(body, sample_stats());
    }

    #[actix_web::test]
    async fn aggregation_failure_maps_to_service_unavailable() {
        let mut dashboard = MockDashboardQuery::new();
        dashboard.expect_dashboard_stats().return_once(|| {
            Err(Error::service_unavailable(
                "dashboard aggregation failed: connection refused",
            ))
        });

        let (app, cookie) = app_and_cookie(dashboard).await;
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/dashboard/stats")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn requires_a_session() {
        let mut dashboard = MockDashboardQuery::new();
        dashboard.expect_dashboard_stats().never();

        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(state_with_dashboard(dashboard)))
                .service(web::scope("/api/v1").service(dashboard_stats)),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/dashboard/stats")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
