//! Server-sent event stream over two bus subscriptions.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::web::Bytes;
use futures_util::Stream;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

use crate::domain::{BusEvent, EventBus, SubscriptionId, Topic, UserId};

/// One client's live event feed.
///
/// Wraps the per-user subscriptions on both topics and renders each
/// delivered event as one SSE frame. Dropping the stream (client
/// disconnect, response teardown) removes both subscriptions, so the bus
/// never accumulates dead entries for closed connections.
pub struct EventStream {
    bus: Arc<EventBus>,
    message_subscription: SubscriptionId,
    notification_subscription: SubscriptionId,
    messages: UnboundedReceiver<BusEvent>,
    notifications: UnboundedReceiver<BusEvent>,
    greeted: bool,
}

impl EventStream {
    /// Subscribe `user_id` to both topics and return the framed stream.
    ///
    /// Message events match when the user is sender or receiver, so a
    /// sender's other open tabs see their own outgoing messages too.
    /// Notification events match on the addressed user only.
    pub fn for_user(bus: Arc<EventBus>, user_id: UserId) -> Self {
        let (message_subscription, messages) = bus.subscribe(
            Topic::Message,
            Box::new(move |event| match event {
                BusEvent::Message(message) => {
                    message.receiver_id == user_id || message.sender_id == user_id
                }
                BusEvent::Notification(_) => false,
            }),
        );
        let (notification_subscription, notifications) = bus.subscribe(
            Topic::Notification,
            Box::new(move |event| match event {
                BusEvent::Notification(notification) => notification.user_id == user_id,
                BusEvent::Message(_) => false,
            }),
        );
        Self {
            bus,
            message_subscription,
            notification_subscription,
            messages,
            notifications,
            greeted: false,
        }
    }

    fn frame(event: &BusEvent) -> Option<Bytes> {
        let (name, json) = match event {
            BusEvent::Message(message) => ("message", serde_json::to_string(message.as_ref())),
            BusEvent::Notification(notification) => {
                ("notification", serde_json::to_string(notification.as_ref()))
            }
        };
        match json {
            Ok(json) => Some(Bytes::from(format!("event: {name}\ndata: {json}\n\n"))),
            Err(error) => {
                warn!(event = name, %error, "dropping unserialisable bus event");
                None
            }
        }
    }
}

impl Stream for EventStream {
    type Item = Result<Bytes, actix_web::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if !this.greeted {
            this.greeted = true;
            // Comment frame; flushes headers and confirms the channel.
            return Poll::Ready(Some(Ok(Bytes::from_static(b": hello\n\n"))));
        }
        loop {
            let mut closed = 0;
            match this.messages.poll_recv(cx) {
                Poll::Ready(Some(event)) => match Self::frame(&event) {
                    Some(frame) => return Poll::Ready(Some(Ok(frame))),
                    None => continue,
                },
                Poll::Ready(None) => closed += 1,
                Poll::Pending => {}
            }
            match this.notifications.poll_recv(cx) {
                Poll::Ready(Some(event)) => match Self::frame(&event) {
                    Some(frame) => return Poll::Ready(Some(Ok(frame))),
                    None => continue,
                },
                Poll::Ready(None) => closed += 1,
                Poll::Pending => {}
            }
            return if closed == 2 {
                Poll::Ready(None)
            } else {
                Poll::Pending
            };
        }
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.message_subscription);
        self.bus.unsubscribe(self.notification_subscription);
    }
}
