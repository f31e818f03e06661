//! End-to-end delivery: a sent message reaches the recipient's live stream
//! and the REST surface agrees with what was stored.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::{App, test, web};
use futures::{Stream, StreamExt};
use futures::task::noop_waker_ref;
use serde_json::json;

use backend::domain::ports::{
    FixtureMessageRepository, FixtureUserDirectory, Messaging, SendMessageRequest,
};
use backend::domain::{EventBus, MessagingService, UserId};
use backend::inbound::http::messages::{
    list_messages, mark_message_read, send_message, unread_message_count,
};
use backend::inbound::sse::EventStream;

mod support;
use support::{fixture_http_state, login_route};

fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_secure(false)
        .cookie_same_site(SameSite::Lax)
        .build()
}

async fn next_frame(stream: &mut EventStream) -> String {
    let frame = stream
        .next()
        .await
        .expect("stream stays open")
        .expect("frame renders");
    String::from_utf8(frame.to_vec()).expect("frames are utf-8")
}

fn stream_is_idle(stream: &mut EventStream) -> bool {
    let mut cx = Context::from_waker(noop_waker_ref());
    matches!(Pin::new(stream).poll_next(&mut cx), Poll::Pending)
}

fn messaging_with(
    bus: &Arc<EventBus>,
    directory: FixtureUserDirectory,
) -> MessagingService<FixtureUserDirectory, FixtureMessageRepository> {
    MessagingService::new(
        Arc::new(directory),
        Arc::new(FixtureMessageRepository::new()),
        Arc::clone(bus),
    )
}

#[tokio::test]
async fn sent_message_reaches_the_recipient_stream() {
    let bus = Arc::new(EventBus::new());
    let alice = UserId::random();
    let bob = UserId::random();
    let messaging = messaging_with(&bus, FixtureUserDirectory::new().with_user("bob", bob));

    let mut bob_stream = EventStream::for_user(Arc::clone(&bus), bob);
    assert_eq!(next_frame(&mut bob_stream).await, ": hello\n\n");

    let stored = messaging
        .send(SendMessageRequest {
            sender_id: alice,
            receiver_username: "bob".to_owned(),
            content: "Hello to bob".to_owned(),
            attachment_url: None,
        })
        .await
        .expect("send succeeds");
    assert!(!stored.read);

    let frame = next_frame(&mut bob_stream).await;
    assert!(frame.starts_with("event: message\ndata: "));
    assert!(frame.contains("\"Hello to bob\""));
    assert!(frame.contains(&stored.id.to_string()));
}

#[tokio::test]
async fn uninvolved_users_receive_nothing() {
    let bus = Arc::new(EventBus::new());
    let alice = UserId::random();
    let bob = UserId::random();
    let carol = UserId::random();
    let messaging = messaging_with(&bus, FixtureUserDirectory::new().with_user("bob", bob));

    let mut carol_stream = EventStream::for_user(Arc::clone(&bus), carol);
    assert_eq!(next_frame(&mut carol_stream).await, ": hello\n\n");

    messaging
        .send(SendMessageRequest {
            sender_id: alice,
            receiver_username: "bob".to_owned(),
            content: "not for carol".to_owned(),
            attachment_url: None,
        })
        .await
        .expect("send succeeds");

    assert!(stream_is_idle(&mut carol_stream));
}

async fn authenticate<S, B, E>(app: &S, user: UserId) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = E,
        >,
    E: std::fmt::Debug,
{
    let response = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/login/{user}"))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success());
    response
        .response()
        .cookies()
        .next()
        .expect("session cookie issued")
        .into_owned()
}

#[actix_web::test]
async fn rest_round_trip_over_fixture_adapters() {
    let bob = UserId::random();
    let alice = UserId::random();
    let state = fixture_http_state(&[("bob", bob)]);

    let app = test::init_service(
        App::new()
            .wrap(session_middleware())
            .app_data(web::Data::new(state))
            .route("/login/{id}", web::get().to(login_route))
            .service(
                web::scope("/api/v1")
                    .service(send_message)
                    .service(list_messages)
                    .service(mark_message_read)
                    .service(unread_message_count),
            ),
    )
    .await;

    let alice_cookie = authenticate(&app, alice).await;
    let bob_cookie = authenticate(&app, bob).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/messages")
            .cookie(alice_cookie)
            .set_json(json!({
                "receiverUsername": "bob",
                "content": "Hello to bob"
            }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success());
    let sent: serde_json::Value = test::read_body_json(response).await;
    let message_id = sent["id"].as_str().expect("message id").to_owned();

    let body: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/messages/unread-count")
            .cookie(bob_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(body["count"], 1);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/messages/{message_id}/read"))
            .cookie(bob_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), actix_web::http::StatusCode::NO_CONTENT);

    let body: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/messages/unread-count")
            .cookie(bob_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(body["count"], 0);
}

#[actix_web::test]
async fn anonymous_requests_are_rejected() {
    let state = fixture_http_state(&[]);
    let app = test::init_service(
        App::new()
            .wrap(session_middleware())
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(list_messages)),
    )
    .await;

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/messages").to_request(),
    )
    .await;
    assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}
