use std::fmt;

use comms::event::MessageBroadcastEvent;
use serde_json::Value;
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::AbortHandle,
};
use tracing::warn;

pub use self::local::LocalBroadcastChannel;

mod local;

/// Receives the body of every delivery on a subscribed destination.
/// The body is `None` when the delivery carried nothing.
pub type MessageHandler = Box<dyn FnMut(Option<&str>) + Send + 'static>;

/// Room-wide publish/subscribe. Every subscriber of a destination receives every
/// message published to it, the publisher included.
pub trait BroadcastChannel: Send + Sync {
    /// Queues `payload` for delivery with its `type` set to `event_type`.
    /// Never waits for the delivery; an error means the message could not even be queued.
    fn publish(&self, destination: &str, event_type: &str, payload: Value) -> anyhow::Result<()>;

    /// Registers a handler for a destination. Dropping the returned [Subscription]
    /// unsubscribes it.
    fn subscribe(&self, destination: &str, handler: MessageHandler)
        -> anyhow::Result<Subscription>;
}

/// A live registration on a destination, torn down when dropped
pub struct Subscription {
    destination: String,
    forwarder: AbortHandle,
    on_dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub(crate) fn new(
        destination: String,
        forwarder: AbortHandle,
        on_dispose: Option<Box<dyn FnOnce() + Send>>,
    ) -> Self {
        Subscription {
            destination,
            forwarder,
            on_dispose,
        }
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.forwarder.abort();

        if let Some(on_dispose) = self.on_dispose.take() {
            on_dispose();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

/// Builds the wire body of an event: the payload object with `type` added
pub fn compose_body(event_type: &str, payload: Value) -> anyhow::Result<String> {
    let mut object = match payload {
        Value::Object(object) => object,
        other => anyhow::bail!("event payload must be a JSON object, got {}", other),
    };
    object.insert(String::from("type"), Value::String(String::from(event_type)));

    Ok(serde_json::to_string(&object)?)
}

/// Spawns the task calling `handler` for every delivery addressed to `destination`
pub(crate) fn spawn_forwarder(
    mut deliveries: broadcast::Receiver<MessageBroadcastEvent>,
    destination: String,
    mut handler: MessageHandler,
) -> AbortHandle {
    tokio::spawn(async move {
        loop {
            match deliveries.recv().await {
                Ok(delivery) if delivery.destination == destination => {
                    handler(delivery.body.as_deref())
                }
                Ok(_) => (),
                // a missed resync is recovered by the next one
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%destination, skipped, "subscription lagged, deliveries were dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
    .abort_handle()
}
