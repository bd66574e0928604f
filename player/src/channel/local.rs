use comms::event::MessageBroadcastEvent;
use serde_json::Value;
use tokio::sync::broadcast;

use super::{compose_body, spawn_forwarder, BroadcastChannel, MessageHandler, Subscription};

const DELIVERY_CHANNEL_CAPACITY: usize = 100;

/// In-process [BroadcastChannel]: every clone shares the same deliveries
#[derive(Debug, Clone)]
pub struct LocalBroadcastChannel {
    deliveries_tx: broadcast::Sender<MessageBroadcastEvent>,
}

impl Default for LocalBroadcastChannel {
    fn default() -> Self {
        let (deliveries_tx, _) = broadcast::channel(DELIVERY_CHANNEL_CAPACITY);

        LocalBroadcastChannel { deliveries_tx }
    }
}

impl LocalBroadcastChannel {
    pub fn new() -> Self {
        LocalBroadcastChannel::default()
    }

    /// Delivers a raw body as is, without composing an event around it
    pub fn deliver(&self, destination: &str, body: Option<String>) {
        // nobody listening is not an error for a broadcast
        let _ = self.deliveries_tx.send(MessageBroadcastEvent {
            destination: String::from(destination),
            body,
        });
    }
}

impl BroadcastChannel for LocalBroadcastChannel {
    fn publish(&self, destination: &str, event_type: &str, payload: Value) -> anyhow::Result<()> {
        let body = compose_body(event_type, payload)?;
        self.deliver(destination, Some(body));

        Ok(())
    }

    fn subscribe(
        &self,
        destination: &str,
        handler: MessageHandler,
    ) -> anyhow::Result<Subscription> {
        let forwarder = spawn_forwarder(
            self.deliveries_tx.subscribe(),
            String::from(destination),
            handler,
        );

        Ok(Subscription::new(String::from(destination), forwarder, None))
    }
}
