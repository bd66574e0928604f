use std::{sync::Arc, time::Duration};

use broker::Broker;
use comms::{
    command::{ClientCommand, PublishCommand},
    destination::room_channel,
    transport::client::split_tcp_stream,
};
use player::{
    client::BrokerClient,
    persistence::WordCountSource,
    resync::ResyncListener,
    session::{DisplayIdentity, Notification, Notifier, Refresher, RoundInfo, SessionContext, Severity},
    submission::{SubmissionController, SubmissionOutcome},
};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{
        broadcast,
        mpsc::{self, UnboundedReceiver, UnboundedSender},
    },
    time::timeout,
};

const ROOM_ID: u64 = 7;
const WAIT: Duration = Duration::from_secs(5);

struct ChannelRefresher(UnboundedSender<()>);

impl Refresher for ChannelRefresher {
    fn refresh(&self) {
        let _ = self.0.send(());
    }
}

struct ChannelNotifier(UnboundedSender<Notification>);

impl Notifier for ChannelNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        let _ = self.0.send(Notification {
            severity,
            message: message.to_string(),
        });
    }
}

struct Participant {
    client: BrokerClient,
    controller: SubmissionController,
    listener: ResyncListener,
    refreshes: UnboundedReceiver<()>,
    notifications: UnboundedReceiver<Notification>,
}

impl Participant {
    async fn join(addr: &str, nickname: &str) -> Participant {
        let client = BrokerClient::connect(addr).await.unwrap();
        let (refresh_tx, refreshes) = mpsc::unbounded_channel();
        let (notification_tx, notifications) = mpsc::unbounded_channel();

        let context = SessionContext {
            room_id: ROOM_ID,
            round: RoundInfo::starting_now("apple"),
            identity: DisplayIdentity {
                nickname: nickname.to_string(),
            },
            refresher: Arc::new(ChannelRefresher(refresh_tx)),
            notifier: Arc::new(ChannelNotifier(notification_tx)),
        };

        let shared_client = Arc::new(client.clone());
        let controller =
            SubmissionController::new(context.clone(), shared_client.clone(), shared_client);
        let mut listener = ResyncListener::new(&context);
        listener.bind(&client).unwrap();

        // the broker answers in command order, so the subscribe has been applied
        // once this count comes back
        assert_eq!(client.fetch_word_count(ROOM_ID).await.unwrap(), 0);

        Participant {
            client,
            controller,
            listener,
            refreshes,
            notifications,
        }
    }

    async fn expect_refresh(&mut self) {
        timeout(WAIT, self.refreshes.recv())
            .await
            .expect("timed out waiting for a refresh")
            .expect("refresher dropped");
    }

    async fn expect_notification(&mut self) -> Notification {
        timeout(WAIT, self.notifications.recv())
            .await
            .expect("timed out waiting for a notification")
            .expect("notifier dropped")
    }
}

async fn start_broker() -> (String, broadcast::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (quit_tx, quit_rx) = broadcast::channel(1);

    tokio::spawn(async move { Broker::new().serve(listener, quit_rx).await });

    (addr, quit_tx)
}

#[tokio::test]
async fn every_participant_refreshes_after_an_accept() {
    let (addr, _quit_tx) = start_broker().await;
    let mut alice = Participant::join(&addr, "alice").await;
    let mut bob = Participant::join(&addr, "bob").await;

    assert_eq!(
        alice.controller.submit_candidate("banana"),
        SubmissionOutcome::Accepted("banana".into())
    );

    // the sender acts on its own resync too
    alice.expect_refresh().await;
    bob.expect_refresh().await;

    // the word was persisted before the resync went out
    assert_eq!(alice.client.fetch_word_count(ROOM_ID).await.unwrap(), 1);
    assert_eq!(bob.client.fetch_word_count(ROOM_ID).await.unwrap(), 1);

    // rejections never reach the room
    alice.controller.submit_candidate("banana");
    assert_eq!(alice.expect_notification().await.severity, Severity::Error);
    assert!(timeout(Duration::from_millis(200), bob.refreshes.recv())
        .await
        .is_err());
}

#[tokio::test]
async fn empty_deliveries_are_reported_and_listening_goes_on() {
    let (addr, _quit_tx) = start_broker().await;
    let mut alice = Participant::join(&addr, "alice").await;
    let mut bob = Participant::join(&addr, "bob").await;

    let stream = TcpStream::connect(&addr).await.unwrap();
    let (_events, mut writer) = split_tcp_stream(stream);
    writer
        .write(&ClientCommand::Publish(PublishCommand {
            destination: room_channel(ROOM_ID),
            body: String::new(),
        }))
        .await
        .unwrap();

    for participant in [&mut alice, &mut bob] {
        let notification = participant.expect_notification().await;
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.message, "got empty message");
    }

    assert!(bob.controller.submit_candidate("cherry").is_accepted());
    alice.expect_refresh().await;
    bob.expect_refresh().await;
    assert_eq!(alice.client.fetch_word_count(ROOM_ID).await.unwrap(), 1);
}

#[tokio::test]
async fn torn_down_listeners_stop_refreshing() {
    let (addr, _quit_tx) = start_broker().await;
    let mut alice = Participant::join(&addr, "alice").await;
    let mut bob = Participant::join(&addr, "bob").await;

    bob.listener.teardown();
    assert!(!bob.listener.is_subscribed());
    // the unsubscribe has been applied once the count comes back
    assert_eq!(bob.client.fetch_word_count(ROOM_ID).await.unwrap(), 0);

    alice.controller.submit_candidate("banana");
    alice.expect_refresh().await;
    assert!(timeout(Duration::from_millis(200), bob.refreshes.recv())
        .await
        .is_err());
}
