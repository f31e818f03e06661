//! Broadcast fan-out and dashboard aggregation over fixture adapters.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, test, web};
use futures::StreamExt;

use backend::domain::ports::{
    FixtureNotificationRepository, FixtureUserDirectory, NotificationContent, Notifications,
};
use backend::domain::{
    EventBus, NotificationKind, NotificationService, UserId,
};
use backend::inbound::http::stats::dashboard_stats;
use backend::inbound::sse::EventStream;

mod support;
use support::{fixture_http_state, login_route};

fn content(title: &str) -> NotificationContent {
    NotificationContent {
        title: title.to_owned(),
        message: "details inside".to_owned(),
        kind: NotificationKind::Info,
        link: None,
    }
}

#[tokio::test]
async fn role_broadcast_notifies_every_member() {
    let bus = Arc::new(EventBus::new());
    let first = UserId::random();
    let second = UserId::random();
    let directory =
        Arc::new(FixtureUserDirectory::new().with_role("manager", vec![first, second]));
    let service = NotificationService::new(
        directory,
        Arc::new(FixtureNotificationRepository::new()),
        Arc::clone(&bus),
    );

    let mut first_stream = EventStream::for_user(Arc::clone(&bus), first);
    let greeting = first_stream.next().await.expect("open").expect("frame");
    assert_eq!(greeting.as_ref(), b": hello\n\n".as_slice());

    let created = service
        .broadcast_by_role("manager", content("Quarterly review"))
        .await
        .expect("broadcast succeeds");
    assert_eq!(created.len(), 2);

    for user in [first, second] {
        assert_eq!(service.unread_count(user).await.expect("count"), 1);
    }

    let frame = first_stream.next().await.expect("open").expect("frame");
    let frame = String::from_utf8(frame.to_vec()).expect("utf-8");
    assert!(frame.starts_with("event: notification\ndata: "));
    assert!(frame.contains("\"Quarterly review\""));
}

#[tokio::test]
async fn marking_read_twice_stays_ok() {
    let bus = Arc::new(EventBus::new());
    let user = UserId::random();
    let directory = Arc::new(FixtureUserDirectory::new());
    let service = NotificationService::new(
        directory,
        Arc::new(FixtureNotificationRepository::new()),
        bus,
    );

    let created = service
        .create(vec![user], content("One-off"))
        .await
        .expect("create succeeds");
    let id = created[0].id;

    service.mark_read(id).await.expect("first mark");
    service.mark_read(id).await.expect("repeat mark is fine");
    assert_eq!(service.unread_count(user).await.expect("count"), 0);
}

#[actix_web::test]
async fn dashboard_endpoint_serves_the_aggregated_snapshot() {
    let state = fixture_http_state(&[]);
    let app = test::init_service(
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                    .cookie_secure(false)
                    .cookie_same_site(SameSite::Lax)
                    .build(),
            )
            .app_data(web::Data::new(state))
            .route("/login/{id}", web::get().to(login_route))
            .service(web::scope("/api/v1").service(dashboard_stats)),
    )
    .await;

    let login = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/login/{}", UserId::random()))
            .to_request(),
    )
    .await;
    let cookie = login
        .response()
        .cookies()
        .next()
        .expect("session cookie issued")
        .into_owned();

    let body: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/dashboard/stats")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(body["totalProperties"], 12);
    assert_eq!(body["availableProperties"], 5);
    assert_eq!(body["incomeCents"], 1_250_000);
    assert_eq!(body["expenseCents"], 480_000);
    assert_eq!(body["balanceCents"], 770_000);
}
