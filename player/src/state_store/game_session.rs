use std::sync::Arc;

use anyhow::Context;
use comms::RoomId;
use tokio::sync::{broadcast, mpsc::UnboundedSender};
use tracing::info;

use crate::{
    client::BrokerClient,
    persistence::WordCountSource,
    resync::ResyncListener,
    session::{DisplayIdentity, RoundInfo, SessionContext},
    submission::{NewWordAppended, SubmissionController},
};

use super::signal::{Signal, SignalNotifier, SignalRefresher};

/// Everything that lives only while the participant is in a room
pub(super) struct GameSession {
    pub client: BrokerClient,
    pub controller: SubmissionController,
    pub appended_rx: broadcast::Receiver<NewWordAppended>,
    listener: ResyncListener,
}

pub(super) struct JoinRequest<'a> {
    pub addr: &'a str,
    pub room_id: RoomId,
    pub keyword: &'a str,
    pub nickname: &'a str,
}

impl GameSession {
    /// Connects, binds the resync listener and starts a round right away
    pub async fn start(
        request: JoinRequest<'_>,
        signal_tx: UnboundedSender<Signal>,
    ) -> anyhow::Result<Self> {
        let client = BrokerClient::connect(request.addr).await?;

        let context = SessionContext {
            room_id: request.room_id,
            round: RoundInfo::starting_now(request.keyword),
            identity: DisplayIdentity {
                nickname: String::from(request.nickname),
            },
            refresher: Arc::new(SignalRefresher(signal_tx.clone())),
            notifier: Arc::new(SignalNotifier(signal_tx.clone())),
        };

        let shared_client = Arc::new(client.clone());
        let controller =
            SubmissionController::new(context.clone(), shared_client.clone(), shared_client);
        let appended_rx = controller.subscribe_appended();

        let mut listener = ResyncListener::new(&context);
        listener
            .bind(&client)
            .context("could not listen on the room channel")?;

        info!(
            room_id = context.room_id,
            nickname = %context.identity.nickname,
            session_id = client.session_id(),
            "joined the room"
        );
        // the count is shown from the start, not only after the first resync
        let _ = signal_tx.send(Signal::RefreshWordCount);

        Ok(GameSession {
            client,
            controller,
            appended_rx,
            listener,
        })
    }

    pub fn room_id(&self) -> RoomId {
        self.controller.context().room_id
    }

    pub fn round(&self) -> &RoundInfo {
        &self.controller.context().round
    }

    /// Detaches a count fetch tagged with the room and round it was asked for
    pub fn refresh_word_count(&self, signal_tx: UnboundedSender<Signal>) {
        let room_id = self.room_id();
        let round_started_at = self.round().start_time;
        let fetch = self.client.fetch_word_count(room_id);

        tokio::spawn(async move {
            let count = fetch.await;

            let _ = signal_tx.send(Signal::WordCountFetched {
                room_id,
                round_started_at,
                count,
            });
        });
    }

    pub fn leave(mut self) {
        self.listener.teardown();
        self.client.quit();
        info!(room_id = self.room_id(), "left the room");
    }
}
