use std::collections::HashSet;

use comms::event::MessageBroadcastEvent;
use tokio::sync::broadcast;

const BROADCAST_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug)]
/// [SubscriptionHandle] ties a session to a destination it subscribed to.
///
/// It is handed out on subscribe and consumed again on unsubscribe.
pub struct SubscriptionHandle {
    destination: String,
    session_id: String,
}

impl SubscriptionHandle {
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[derive(Debug)]
/// [Topic] owns the broadcast channel of a single destination and the sessions subscribed to it
pub struct Topic {
    destination: String,
    broadcast_tx: broadcast::Sender<MessageBroadcastEvent>,
    subscribers: HashSet<String>,
}

impl Topic {
    pub fn new(destination: &str) -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CHANNEL_CAPACITY);

        Topic {
            destination: String::from(destination),
            broadcast_tx,
            subscribers: HashSet::new(),
        }
    }

    /// Add a session to the topic
    ///
    /// # Returns
    ///
    /// - A broadcast receiver for every delivery published from now on
    /// - A [SubscriptionHandle] to give back when the session leaves
    pub fn subscribe(
        &mut self,
        session_id: &str,
    ) -> (broadcast::Receiver<MessageBroadcastEvent>, SubscriptionHandle) {
        self.subscribers.insert(String::from(session_id));

        (
            self.broadcast_tx.subscribe(),
            SubscriptionHandle {
                destination: self.destination.clone(),
                session_id: String::from(session_id),
            },
        )
    }

    /// Remove a session from the topic, returns false if it was not subscribed
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        self.subscribers.remove(&handle.session_id)
    }

    /// Fan out a body to every receiver, the publisher's own included.
    /// Returns how many receivers the delivery reached.
    pub fn publish(&self, body: Option<String>) -> usize {
        self.broadcast_tx
            .send(MessageBroadcastEvent {
                destination: self.destination.clone(),
                body,
            })
            .unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let mut topic = Topic::new("/queue/manager.room.1");
        let (mut rx_a, _handle_a) = topic.subscribe("a");
        let (mut rx_b, _handle_b) = topic.subscribe("b");

        assert_eq!(topic.publish(Some("hello".into())), 2);

        for rx in [&mut rx_a, &mut rx_b] {
            let delivery = rx.recv().await.unwrap();
            assert_eq!(delivery.destination, "/queue/manager.room.1");
            assert_eq!(delivery.body.as_deref(), Some("hello"));
        }
    }

    #[test]
    fn test_publish_without_receivers_is_dropped() {
        let topic = Topic::new("/queue/manager.room.1");

        assert_eq!(topic.publish(None), 0);
    }

    #[test]
    fn test_session_counted_once() {
        let mut topic = Topic::new("/queue/manager.room.1");
        let (_rx_1, handle_1) = topic.subscribe("a");
        let (_rx_2, handle_2) = topic.subscribe("a");

        assert_eq!(topic.subscriber_count(), 1);
        assert!(topic.unsubscribe(handle_1));
        assert!(!topic.unsubscribe(handle_2));
        assert!(topic.is_empty());
    }
}
