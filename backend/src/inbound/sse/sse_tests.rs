use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use futures::{Stream, StreamExt};
use futures::task::noop_waker_ref;
use std::task::{Context, Poll};
use uuid::Uuid;

use super::*;
use crate::domain::{BusEvent, Message, Notification, NotificationKind, Topic, UserId};
use crate::inbound::http::test_utils::{issue_session, test_session_middleware};

fn message_between(sender: UserId, receiver: UserId, content: &str) -> BusEvent {
    BusEvent::Message(Arc::new(Message {
        id: Uuid::new_v4(),
        sender_id: sender,
        receiver_id: receiver,
        content: content.to_owned(),
        attachment_url: None,
        read: false,
        created_at: Utc::now(),
    }))
}

fn notification_for(user: UserId) -> BusEvent {
    BusEvent::Notification(Arc::new(Notification {
        id: Uuid::new_v4(),
        user_id: user,
        title: "Maintenance window".to_owned(),
        message: "Saturday 02:00".to_owned(),
        kind: NotificationKind::Warning,
        link: None,
        read: false,
        created_at: Utc::now(),
    }))
}

async fn next_frame(stream: &mut EventStream) -> String {
    let frame = stream
        .next()
        .await
        .expect("stream stays open")
        .expect("frame renders");
    String::from_utf8(frame.to_vec()).expect("frames are utf-8")
}

fn poll_once(stream: &mut EventStream) -> Poll<Option<String>> {
    let mut cx = Context::from_waker(noop_waker_ref());
    match std::pin::Pin::new(stream).poll_next(&mut cx) {
        Poll::Ready(Some(Ok(frame))) => Poll::Ready(Some(
            String::from_utf8(frame.to_vec()).expect("frames are utf-8"),
        )),
        Poll::Ready(Some(Err(_))) => panic!("stream errored"),
        Poll::Ready(None) => Poll::Ready(None),
        Poll::Pending => Poll::Pending,
    }
}

#[tokio::test]
async fn opens_with_a_greeting_comment() {
    let bus = Arc::new(EventBus::new());
    let mut stream = EventStream::for_user(Arc::clone(&bus), UserId::random());
    assert_eq!(next_frame(&mut stream).await, ": hello\n\n");
}

#[tokio::test]
async fn delivers_messages_addressed_to_the_user() {
    let bus = Arc::new(EventBus::new());
    let alice = UserId::random();
    let bob = UserId::random();
    let mut stream = EventStream::for_user(Arc::clone(&bus), bob);
    assert_eq!(next_frame(&mut stream).await, ": hello\n\n");

    bus.publish(Topic::Message, &message_between(alice, bob, "Hello bob"));

    let frame = next_frame(&mut stream).await;
    assert!(frame.starts_with("event: message\ndata: "));
    assert!(frame.ends_with("\n\n"));
    assert!(frame.contains("\"Hello bob\""));
}

#[tokio::test]
async fn sender_sees_their_own_outgoing_messages() {
    let bus = Arc::new(EventBus::new());
    let alice = UserId::random();
    let bob = UserId::random();
    let mut stream = EventStream::for_user(Arc::clone(&bus), alice);
    assert_eq!(next_frame(&mut stream).await, ": hello\n\n");

    bus.publish(Topic::Message, &message_between(alice, bob, "ping"));

    let frame = next_frame(&mut stream).await;
    assert!(frame.contains("\"ping\""));
}

#[tokio::test]
async fn third_parties_never_see_the_exchange() {
    let bus = Arc::new(EventBus::new());
    let alice = UserId::random();
    let bob = UserId::random();
    let carol = UserId::random();
    let mut stream = EventStream::for_user(Arc::clone(&bus), carol);
    assert_eq!(next_frame(&mut stream).await, ": hello\n\n");

    bus.publish(Topic::Message, &message_between(alice, bob, "private"));
    bus.publish(Topic::Notification, &notification_for(bob));

    assert!(poll_once(&mut stream).is_pending());
}

#[tokio::test]
async fn delivers_notifications_for_the_user() {
    let bus = Arc::new(EventBus::new());
    let bob = UserId::random();
    let mut stream = EventStream::for_user(Arc::clone(&bus), bob);
    assert_eq!(next_frame(&mut stream).await, ": hello\n\n");

    bus.publish(Topic::Notification, &notification_for(bob));

    let frame = next_frame(&mut stream).await;
    assert!(frame.starts_with("event: notification\ndata: "));
    assert!(frame.contains("\"Maintenance window\""));
}

#[tokio::test]
async fn dropping_the_stream_removes_both_subscriptions() {
    let bus = Arc::new(EventBus::new());
    let stream = EventStream::for_user(Arc::clone(&bus), UserId::random());
    assert_eq!(bus.subscriber_count(Topic::Message), 1);
    assert_eq!(bus.subscriber_count(Topic::Notification), 1);

    drop(stream);

    assert_eq!(bus.subscriber_count(Topic::Message), 0);
    assert_eq!(bus.subscriber_count(Topic::Notification), 0);
}

#[actix_web::test]
async fn endpoint_requires_a_session() {
    let bus = web::Data::new(EventBus::new());
    let app = test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(bus)
            .service(web::scope("/api/v1").service(events)),
    )
    .await;

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/events").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn endpoint_answers_with_an_event_stream() {
    let bus = web::Data::new(EventBus::new());
    let app = test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(bus.clone())
            .route("/test-login/{id}", web::get().to(issue_session))
            .service(web::scope("/api/v1").service(events)),
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

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/events")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .expect("content type set");
    assert_eq!(content_type, "text/event-stream");
    assert_eq!(bus.subscriber_count(Topic::Message), 1);
}
