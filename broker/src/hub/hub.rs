use std::collections::HashMap;

use comms::event::MessageBroadcastEvent;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use super::topic::{SubscriptionHandle, Topic};

pub type SubscribeResult = (broadcast::Receiver<MessageBroadcastEvent>, SubscriptionHandle);

/// [Hub] keeps every live destination of the broker.
///
/// Destinations are not declared up front: a topic is created by its first subscriber
/// and pruned once its last subscriber leaves.
#[derive(Debug, Default)]
pub struct Hub {
    topics: Mutex<HashMap<String, Topic>>,
}

impl Hub {
    pub fn new() -> Self {
        Hub::default()
    }

    /// Subscribes a session to a destination, creating the destination if needed
    pub async fn subscribe(&self, destination: &str, session_id: &str) -> SubscribeResult {
        let mut topics = self.topics.lock().await;

        topics
            .entry(String::from(destination))
            .or_insert_with(|| {
                debug!(destination, "creating topic");
                Topic::new(destination)
            })
            .subscribe(session_id)
    }

    /// Publishes a body to a destination. Returns how many receivers it reached,
    /// zero when nobody subscribes to the destination.
    pub async fn publish(&self, destination: &str, body: Option<String>) -> usize {
        let topics = self.topics.lock().await;

        topics
            .get(destination)
            .map(|topic| topic.publish(body))
            .unwrap_or(0)
    }

    /// Gives a subscription back, dropping the destination when it was the last one
    pub async fn drop_subscription_handle(&self, handle: SubscriptionHandle) {
        let mut topics = self.topics.lock().await;
        let destination = String::from(handle.destination());

        if let Some(topic) = topics.get_mut(&destination) {
            topic.unsubscribe(handle);

            if topic.is_empty() {
                debug!(destination = %destination, "pruning topic");
                topics.remove(&destination);
            }
        }
    }

    pub async fn subscriber_count(&self, destination: &str) -> usize {
        self.topics
            .lock()
            .await
            .get(destination)
            .map(Topic::subscriber_count)
            .unwrap_or(0)
    }

    pub async fn destination_count(&self) -> usize {
        self.topics.lock().await.len()
    }
}
