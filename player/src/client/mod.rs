use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::Context;
use comms::{
    command::{
        ClientCommand, FetchWordCountCommand, PublishCommand, QuitCommand, SubscribeCommand,
        UnsubscribeCommand,
    },
    event::{BrokerEvent, MessageBroadcastEvent, WordCountReplyEvent},
    record::WordSubmissionRecord,
    transport, RoomId,
};
use serde_json::Value;
use tokio::{
    net::TcpStream,
    sync::{broadcast, mpsc, oneshot, watch},
    task::AbortHandle,
};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::{
    channel::{compose_body, spawn_forwarder, BroadcastChannel, MessageHandler, Subscription},
    persistence::{Pending, WordCountSource, WordPersistence},
};

const DELIVERY_CHANNEL_CAPACITY: usize = 100;

type CommandEnvelope = (Option<oneshot::Sender<anyhow::Result<()>>>, ClientCommand);
type PendingCounts = Arc<Mutex<HashMap<RoomId, VecDeque<oneshot::Sender<u64>>>>>;

/// Aborts the connection tasks once the last clone of the client is dropped
#[derive(Debug)]
struct ConnectionTasks(Vec<AbortHandle>);

impl Drop for ConnectionTasks {
    fn drop(&mut self) {
        for task in self.0.iter() {
            task.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [BrokerClient] is one participant connection to the broker.
///
/// It serves as the room broadcast channel, the word persistence endpoint and the
/// word count source at once. Commands go out in the order they are queued, which
/// the broker preserves, so a word persisted before a publish is visible to every
/// refresh that publish triggers.
#[derive(Debug, Clone)]
pub struct BrokerClient {
    _tasks: Arc<ConnectionTasks>,
    session_id: String,
    command_tx: mpsc::UnboundedSender<CommandEnvelope>,
    deliveries_tx: broadcast::Sender<MessageBroadcastEvent>,
    pending_counts: PendingCounts,
    subscription_counts: Arc<Mutex<HashMap<String, usize>>>,
    closed_rx: watch::Receiver<bool>,
}

impl BrokerClient {
    /// Connects and waits for the broker's welcome
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("could not connect to the broker at {}", addr))?;
        let (mut event_stream, mut command_writer) = transport::client::split_tcp_stream(stream);

        let session_id = match event_stream.next().await {
            Some(Ok(BrokerEvent::Welcome(welcome))) => welcome.session_id,
            Some(Ok(other)) => anyhow::bail!("expected a welcome from the broker, got {:?}", other),
            Some(Err(err)) => return Err(err.context("broker sent a malformed welcome")),
            None => anyhow::bail!("broker closed the connection before welcoming"),
        };
        info!(%session_id, addr, "connected to the broker");

        let (deliveries_tx, _) = broadcast::channel(DELIVERY_CHANNEL_CAPACITY);
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<CommandEnvelope>();
        let (closed_tx, closed_rx) = watch::channel(false);
        let pending_counts: PendingCounts = Arc::new(Mutex::new(HashMap::new()));

        let reader = tokio::spawn({
            let deliveries_tx = deliveries_tx.clone();
            let pending_counts = pending_counts.clone();

            async move {
                while let Some(result) = event_stream.next().await {
                    match result {
                        Ok(BrokerEvent::Message(delivery)) => {
                            // no local subscriber is not an error
                            let _ = deliveries_tx.send(delivery);
                        }
                        Ok(BrokerEvent::WordCount(reply)) => resolve_count(&pending_counts, reply),
                        Ok(BrokerEvent::Welcome(_)) => warn!("ignoring a repeated welcome"),
                        Err(err) => warn!("dropping malformed event: {:#}", err),
                    }
                }

                info!("broker closed the connection");
                // waiters get a closed channel instead of hanging forever
                lock(&pending_counts).clear();
                let _ = closed_tx.send(true);
            }
        });

        let writer = tokio::spawn(async move {
            while let Some((ack, command)) = command_rx.recv().await {
                let result = command_writer.write(&command).await;

                if let Err(err) = result.as_ref() {
                    warn!("could not write command to the broker: {:#}", err);
                }
                if let Some(ack) = ack {
                    let _ = ack.send(result);
                }
            }
        });

        Ok(BrokerClient {
            _tasks: Arc::new(ConnectionTasks(vec![
                reader.abort_handle(),
                writer.abort_handle(),
            ])),
            session_id,
            command_tx,
            deliveries_tx,
            pending_counts,
            subscription_counts: Arc::new(Mutex::new(HashMap::new())),
            closed_rx,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Resolves once the broker has closed the connection
    pub async fn closed(&self) {
        let mut closed_rx = self.closed_rx.clone();

        let _ = closed_rx.wait_for(|closed| *closed).await;
    }

    /// Tells the broker this participant is leaving
    pub fn quit(&self) {
        if let Err(err) = self.enqueue(ClientCommand::Quit(QuitCommand), None) {
            debug!("could not send quit: {:#}", err);
        }
    }

    fn enqueue(
        &self,
        command: ClientCommand,
        ack: Option<oneshot::Sender<anyhow::Result<()>>>,
    ) -> anyhow::Result<()> {
        self.command_tx
            .send((ack, command))
            .map_err(|_| anyhow::anyhow!("the broker connection is closed"))
    }
}

/// Registers a count waiter only once `send` queued its request. The lock is held
/// across both, so waiters line up in the order their requests went out.
fn register_count_waiter(
    pending_counts: &PendingCounts,
    room_id: RoomId,
    send: impl FnOnce() -> anyhow::Result<()>,
) -> anyhow::Result<oneshot::Receiver<u64>> {
    let mut pending_counts = lock(pending_counts);
    send()?;

    let (count_tx, count_rx) = oneshot::channel();
    pending_counts.entry(room_id).or_default().push_back(count_tx);

    Ok(count_rx)
}

fn resolve_count(pending_counts: &PendingCounts, reply: WordCountReplyEvent) {
    let waiter = lock(pending_counts)
        .get_mut(&reply.room_id)
        .and_then(VecDeque::pop_front);

    match waiter {
        Some(waiter) => {
            let _ = waiter.send(reply.count);
        }
        None => warn!(room_id = reply.room_id, "word count nobody asked for"),
    }
}

impl BroadcastChannel for BrokerClient {
    fn publish(&self, destination: &str, event_type: &str, payload: Value) -> anyhow::Result<()> {
        let body = compose_body(event_type, payload)?;

        self.enqueue(
            ClientCommand::Publish(PublishCommand {
                destination: String::from(destination),
                body,
            }),
            None,
        )
    }

    fn subscribe(
        &self,
        destination: &str,
        handler: MessageHandler,
    ) -> anyhow::Result<Subscription> {
        // listen locally before asking the broker, so no delivery slips in between
        let forwarder = spawn_forwarder(
            self.deliveries_tx.subscribe(),
            String::from(destination),
            handler,
        );

        let is_first = {
            let mut counts = lock(&self.subscription_counts);
            let count = counts.entry(String::from(destination)).or_insert(0);
            *count += 1;
            *count == 1
        };

        if is_first {
            if let Err(err) = self.enqueue(
                ClientCommand::Subscribe(SubscribeCommand {
                    destination: String::from(destination),
                }),
                None,
            ) {
                forwarder.abort();
                lock(&self.subscription_counts).remove(destination);
                return Err(err);
            }
        }

        let on_dispose: Box<dyn FnOnce() + Send> = Box::new({
            let destination = String::from(destination);
            let counts = self.subscription_counts.clone();
            let command_tx = self.command_tx.clone();

            move || {
                let is_last = {
                    let mut counts = lock(&counts);
                    match counts.get_mut(&destination) {
                        Some(count) if *count > 1 => {
                            *count -= 1;
                            false
                        }
                        Some(_) => {
                            counts.remove(&destination);
                            true
                        }
                        None => false,
                    }
                };

                if is_last {
                    let _ = command_tx.send((
                        None,
                        ClientCommand::Unsubscribe(UnsubscribeCommand { destination }),
                    ));
                }
            }
        });

        Ok(Subscription::new(
            String::from(destination),
            forwarder,
            Some(on_dispose),
        ))
    }
}

impl WordPersistence for BrokerClient {
    fn persist_word(&self, record: WordSubmissionRecord) -> Pending<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        let enqueued = self.enqueue(ClientCommand::PersistWord(record), Some(ack_tx));

        Box::pin(async move {
            enqueued?;

            ack_rx
                .await
                .context("the broker connection dropped the word")?
        })
    }
}

impl WordCountSource for BrokerClient {
    fn fetch_word_count(&self, room_id: RoomId) -> Pending<u64> {
        let registered = register_count_waiter(&self.pending_counts, room_id, || {
            self.enqueue(
                ClientCommand::FetchWordCount(FetchWordCountCommand { room_id }),
                None,
            )
        });

        Box::pin(async move {
            registered?
                .await
                .context("the broker connection closed before answering")
        })
    }
}
