use std::{collections::HashMap, sync::Arc};

use comms::{
    command::ClientCommand,
    event::{BrokerEvent, WordCountReplyEvent},
};
use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    task::AbortHandle,
};
use tracing::{debug, warn};

use crate::{
    hub::{Hub, SubscriptionHandle},
    ledger::WordLedger,
};

const SESSION_QUEUE_CAPACITY: usize = 100;

/// [RelaySession] holds the broker side state of one participant connection:
/// the destinations it subscribes to and a single queue aggregating their deliveries.
///
/// Each subscription owns exactly one forwarding task, aborted when the subscription
/// ends or the session is dropped.
pub(super) struct RelaySession {
    session_id: String,
    hub: Arc<Hub>,
    ledger: Arc<WordLedger>,
    subscriptions: HashMap<String, (SubscriptionHandle, AbortHandle)>,
    mpsc_tx: mpsc::Sender<BrokerEvent>,
    mpsc_rx: mpsc::Receiver<BrokerEvent>,
}

impl RelaySession {
    pub fn new(session_id: &str, hub: Arc<Hub>, ledger: Arc<WordLedger>) -> Self {
        let (mpsc_tx, mpsc_rx) = mpsc::channel(SESSION_QUEUE_CAPACITY);

        RelaySession {
            session_id: String::from(session_id),
            hub,
            ledger,
            subscriptions: HashMap::new(),
            mpsc_tx,
            mpsc_rx,
        }
    }

    /// Handle a command of the participant.
    /// Returns the reply to write back, for the commands that have one.
    pub async fn handle_command(&mut self, cmd: ClientCommand) -> Option<BrokerEvent> {
        match cmd {
            ClientCommand::Subscribe(cmd) => {
                if self.subscriptions.contains_key(&cmd.destination) {
                    debug!(session_id = %self.session_id, destination = %cmd.destination, "already subscribed");
                    return None;
                }

                let (mut broadcast_rx, handle) = self
                    .hub
                    .subscribe(&cmd.destination, &self.session_id)
                    .await;

                // forward the destination's deliveries into the session queue
                // so that one writer serves every subscribed destination
                let forwarder = tokio::spawn({
                    let mpsc_tx = self.mpsc_tx.clone();
                    let session_id = self.session_id.clone();

                    async move {
                        loop {
                            match broadcast_rx.recv().await {
                                Ok(delivery) => {
                                    if mpsc_tx.send(BrokerEvent::Message(delivery)).await.is_err() {
                                        break;
                                    }
                                }
                                Err(RecvError::Lagged(skipped)) => {
                                    warn!(%session_id, skipped, "session lagged behind a destination");
                                }
                                Err(RecvError::Closed) => break,
                            }
                        }
                    }
                });

                self.subscriptions
                    .insert(cmd.destination, (handle, forwarder.abort_handle()));

                None
            }
            ClientCommand::Unsubscribe(cmd) => {
                if let Some(subscription) = self.subscriptions.remove(&cmd.destination) {
                    self.cleanup_subscription(subscription).await;
                }

                None
            }
            ClientCommand::Publish(cmd) => {
                let reached = self.hub.publish(&cmd.destination, Some(cmd.body)).await;
                debug!(session_id = %self.session_id, destination = %cmd.destination, reached, "published");

                None
            }
            ClientCommand::PersistWord(record) => {
                debug!(session_id = %self.session_id, room_id = record.room_id, "recording word");
                self.ledger.record(record).await;

                None
            }
            ClientCommand::FetchWordCount(cmd) => {
                Some(BrokerEvent::WordCount(WordCountReplyEvent {
                    room_id: cmd.room_id,
                    count: self.ledger.count(cmd.room_id).await,
                }))
            }
            ClientCommand::Quit(_) => None,
        }
    }

    /// Leave every destination the participant is subscribed to
    pub async fn leave_all(&mut self) {
        let drained = self.subscriptions.drain().collect::<Vec<_>>();

        for (_, subscription) in drained {
            self.cleanup_subscription(subscription).await;
        }
    }

    /// Give the subscription back to the hub and stop forwarding its deliveries
    async fn cleanup_subscription(
        &mut self,
        (handle, abort_handle): (SubscriptionHandle, AbortHandle),
    ) {
        self.hub.drop_subscription_handle(handle).await;

        abort_handle.abort();
    }

    /// Receive a delivery from any of the destinations the participant subscribes to
    pub async fn recv(&mut self) -> Option<BrokerEvent> {
        self.mpsc_rx.recv().await
    }
}

impl Drop for RelaySession {
    fn drop(&mut self) {
        for (_, abort_handle) in self.subscriptions.values() {
            abort_handle.abort();
        }
    }
}
