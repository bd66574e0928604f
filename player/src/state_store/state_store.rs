use std::time::Duration;

use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use tracing::{debug, warn};

use crate::{config::Settings, Interrupted, Terminator};

use super::{
    action::Action,
    game_session::{GameSession, JoinRequest},
    signal::Signal,
    State,
};

pub struct StateStore {
    state_tx: UnboundedSender<State>,
    initial_state: State,
}

impl StateStore {
    pub fn new(settings: &Settings) -> (Self, UnboundedReceiver<State>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel::<State>();

        (
            StateStore {
                state_tx,
                initial_state: State::new(settings),
            },
            state_rx,
        )
    }
}

impl StateStore {
    pub async fn main_loop(
        self,
        mut terminator: Terminator,
        mut action_rx: UnboundedReceiver<Action>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let (signal_tx, mut signal_rx) = mpsc::unbounded_channel::<Signal>();
        let mut opt_session: Option<GameSession> = None;
        let mut state = self.initial_state.clone();

        // the initial state once
        self.state_tx.send(state.clone())?;

        let mut ticker = tokio::time::interval(Duration::from_secs(1));

        let result = loop {
            if let Some(session) = opt_session.as_mut() {
                tokio::select! {
                    // broker disconnected, back to the connect page
                    _ = session.client.closed() => {
                        warn!(room_id = state.room_id, "lost the broker connection");
                        opt_session = None;
                        state.process_disconnect();
                    },
                    // Handle the actions coming from the UI
                    Some(action) = action_rx.recv() => match action {
                        Action::EditPendingWord { text } => {
                            session.controller.edit_pending_word(text.as_str());
                            state.edit_pending_word(text);
                        },
                        Action::CommitPendingWord => {
                            let outcome = session.controller.commit();
                            debug!(?outcome, "committed the pending word");

                            state.sync_submission(&session.controller);
                        },
                        Action::Exit => {
                            let _ = terminator.terminate(Interrupted::UserInt);

                            break Interrupted::UserInt;
                        },
                        Action::ConnectToBrokerRequest { .. } => (),
                    },
                    // Handle what the session collaborators and detached tasks report back
                    Some(signal) = signal_rx.recv() => match signal {
                        Signal::RefreshWordCount => session.refresh_word_count(signal_tx.clone()),
                        Signal::WordCountFetched { room_id, round_started_at, count } => match count {
                            Ok(count) => {
                                if !state.apply_word_count(room_id, round_started_at, count) {
                                    debug!(room_id, "discarding the word count of a round already left");
                                }
                            },
                            Err(err) => warn!(room_id, "could not fetch the word count: {:#}", err),
                        },
                        Signal::Notify(notification) => state.push_notification(notification),
                    },
                    Ok(appended) = session.appended_rx.recv() => {
                        state.cue_appended(&appended);
                    },
                    // Tick to terminate the select every N milliseconds
                    _ = ticker.tick() => {
                        state.tick_timer();
                    },
                    // Catch and handle interrupt signal to gracefully shutdown
                    Ok(interrupted) = interrupt_rx.recv() => {
                        break interrupted;
                    }
                }
            } else {
                tokio::select! {
                    Some(action) = action_rx.recv() => match action {
                        Action::ConnectToBrokerRequest { addr } => {
                            state.mark_connection_request_start();
                            // emit event to re-render any part depending on the connection status
                            self.state_tx.send(state.clone())?;

                            let request = JoinRequest {
                                addr: &addr,
                                room_id: state.room_id,
                                keyword: &state.keyword,
                                nickname: &state.nickname,
                            };

                            let joined = GameSession::start(request, signal_tx.clone()).await;

                            match joined {
                                Ok(session) => {
                                    state.process_connection_request_result(Ok(addr.clone()));
                                    state.enter_round(session.client.session_id(), session.round().start_time);
                                    let _ = opt_session.insert(session);
                                    // ticker needs to be resetted to avoid showing time spent connecting to the broker
                                    ticker.reset();
                                },
                                Err(err) => {
                                    warn!("could not join the room: {:#}", err);
                                    state.process_connection_request_result(Err(err));
                                }
                            }
                        },
                        Action::Exit => {
                            let _ = terminator.terminate(Interrupted::UserInt);

                            break Interrupted::UserInt;
                        },
                        _ => (),
                    },
                    // leftovers of a lost session, only the notifications are still worth showing
                    Some(signal) = signal_rx.recv() => {
                        if let Signal::Notify(notification) = signal {
                            state.push_notification(notification);
                        }
                    },
                    // Catch and handle interrupt signal to gracefully shutdown
                    Ok(interrupted) = interrupt_rx.recv() => {
                        break interrupted;
                    }
                }
            }

            self.state_tx.send(state.clone())?;
        };

        if let Some(session) = opt_session.take() {
            session.leave();
        }

        Ok(result)
    }
}
