use comms::{destination::room_channel, RoomId};
use tracing::{debug, info};

use crate::{
    channel::{BroadcastChannel, Subscription},
    session::SessionContext,
};

use super::ResyncHandler;

enum ListenerState {
    Unsubscribed,
    Subscribed(Subscription),
}

/// Standing subscription on the room channel which refreshes the aggregate word count
/// whenever any participant, this one included, announces a change.
pub struct ResyncListener {
    room_id: RoomId,
    handler: ResyncHandler,
    state: ListenerState,
}

impl ResyncListener {
    pub fn new(context: &SessionContext) -> Self {
        ResyncListener {
            room_id: context.room_id,
            handler: ResyncHandler::new(context.refresher.clone(), context.notifier.clone()),
            state: ListenerState::Unsubscribed,
        }
    }

    pub fn destination(&self) -> String {
        room_channel(self.room_id)
    }

    pub fn is_subscribed(&self) -> bool {
        matches!(self.state, ListenerState::Subscribed(_))
    }

    /// Called on room join
    pub fn bind(&mut self, channel: &dyn BroadcastChannel) -> anyhow::Result<()> {
        if self.is_subscribed() {
            anyhow::bail!("already listening on room {}", self.room_id);
        }

        let handler = self.handler.clone();
        let subscription = channel.subscribe(
            &self.destination(),
            Box::new(move |body| {
                handler.handle(body);
            }),
        )?;

        info!(room_id = self.room_id, "listening for room resyncs");
        self.state = ListenerState::Subscribed(subscription);

        Ok(())
    }

    /// Called on room leave. Does nothing when not subscribed.
    pub fn teardown(&mut self) {
        if let ListenerState::Subscribed(subscription) =
            std::mem::replace(&mut self.state, ListenerState::Unsubscribed)
        {
            debug!(room_id = self.room_id, "stopped listening for room resyncs");
            subscription.unsubscribe();
        }
    }
}

impl Drop for ResyncListener {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use serde_json::json;
    use tokio::time::timeout;

    use super::*;
    use crate::{
        channel::LocalBroadcastChannel,
        session::{RoundInfo, Severity},
        test_support::{context, RecordingNotifier, SignallingRefresher},
    };

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_bind_and_teardown() {
        let channel = LocalBroadcastChannel::new();
        let (refresher, mut refreshes) = SignallingRefresher::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let mut listener = ResyncListener::new(&context(
            3,
            RoundInfo::starting_now("apple"),
            refresher,
            notifier.clone(),
        ));

        assert!(!listener.is_subscribed());
        listener.bind(&channel).unwrap();
        assert!(listener.is_subscribed());
        assert!(listener.bind(&channel).is_err());

        channel
            .publish(&room_channel(3), "CHECK_DB", json!({ "roomId": 3 }))
            .unwrap();
        timeout(WAIT, refreshes.recv()).await.unwrap().unwrap();

        listener.teardown();
        assert!(!listener.is_subscribed());
        listener.teardown();

        channel
            .publish(&room_channel(3), "CHECK_DB", json!({ "roomId": 3 }))
            .unwrap();
        assert!(timeout(Duration::from_millis(100), refreshes.recv())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_keeps_listening_after_an_anomaly() {
        let channel = LocalBroadcastChannel::new();
        let (refresher, mut refreshes) = SignallingRefresher::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let mut listener = ResyncListener::new(&context(
            3,
            RoundInfo::starting_now("apple"),
            refresher,
            notifier.clone(),
        ));
        listener.bind(&channel).unwrap();

        channel.deliver(&room_channel(3), None);
        channel
            .publish(&room_channel(3), "UNKNOWN", json!({}))
            .unwrap();
        channel
            .publish(&room_channel(4), "CHECK_DB", json!({ "roomId": 4 }))
            .unwrap();
        channel
            .publish(&room_channel(3), "CHECK_DB", json!({ "roomId": 3 }))
            .unwrap();

        timeout(WAIT, refreshes.recv()).await.unwrap().unwrap();
        assert!(refreshes.try_recv().is_err());

        let notifications = notifier.taken();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].severity, Severity::Error);
        assert_eq!(notifications[0].message, "got empty message");
    }
}
