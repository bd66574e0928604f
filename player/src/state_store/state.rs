use chrono::{DateTime, Utc};
use circular_queue::CircularQueue;
use comms::RoomId;

use crate::{
    config::Settings,
    session::Notification,
    submission::{NewWordAppended, SubmissionController},
};

const MAX_NOTIFICATIONS_TO_KEEP: usize = 5;
/// Timer ticks the newest word stays highlighted for
const APPENDED_CUE_TICKS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerConnectionStatus {
    Uninitalized,
    Connecting,
    Connected { addr: String },
    Errored { err: String },
}

/// Highlight of a freshly appended word, expires with the timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedCue {
    pub position: usize,
    pub until_tick: usize,
}

/// State holds the state of the application
#[derive(Debug, Clone)]
pub struct State {
    pub connection_status: BrokerConnectionStatus,
    /// Where the connect page connects to
    pub broker_addr: String,
    pub room_id: RoomId,
    pub nickname: String,
    pub keyword: String,
    /// Session id the broker assigned to this participant
    pub session_id: Option<String>,
    pub round_started_at: Option<DateTime<Utc>>,
    pub pending_word: String,
    /// Bumped whenever the store rewrote the pending word, so the input box knows to
    /// pick it up instead of keeping its own text
    pub pending_word_revision: u64,
    pub accepted_words: Vec<String>,
    /// Aggregate word count of the room, unknown until the first refresh lands
    pub word_count: Option<u64>,
    pub notifications: CircularQueue<Notification>,
    pub appended_cue: Option<AppendedCue>,
    /// Seconds since the round was joined
    pub timer: usize,
}

impl State {
    pub fn new(settings: &Settings) -> Self {
        State {
            connection_status: BrokerConnectionStatus::Uninitalized,
            broker_addr: settings.broker.clone(),
            room_id: settings.room,
            nickname: settings.nickname.clone(),
            keyword: settings.keyword.clone(),
            session_id: None,
            round_started_at: None,
            pending_word: String::new(),
            pending_word_revision: 0,
            accepted_words: Vec::new(),
            word_count: None,
            notifications: CircularQueue::with_capacity(MAX_NOTIFICATIONS_TO_KEEP),
            appended_cue: None,
            timer: 0,
        }
    }

    pub fn mark_connection_request_start(&mut self) {
        self.connection_status = BrokerConnectionStatus::Connecting;
    }

    /// Processes the result of a connection request to change the state of the application
    pub fn process_connection_request_result(&mut self, result: anyhow::Result<String>) {
        self.connection_status = match result {
            Ok(addr) => BrokerConnectionStatus::Connected { addr },
            Err(err) => BrokerConnectionStatus::Errored {
                err: format!("{:#}", err),
            },
        }
    }

    pub fn enter_round(&mut self, session_id: &str, round_started_at: DateTime<Utc>) {
        self.session_id = Some(String::from(session_id));
        self.round_started_at = Some(round_started_at);
        self.word_count = None;
        self.accepted_words.clear();
        self.set_pending_word_from_store(String::new());
        self.appended_cue = None;
        self.timer = 0;
    }

    /// The broker went away, back to the connect page with the round forgotten
    pub fn process_disconnect(&mut self) {
        self.connection_status = BrokerConnectionStatus::Errored {
            err: String::from("the broker closed the connection"),
        };
        self.session_id = None;
        self.round_started_at = None;
        self.word_count = None;
        self.appended_cue = None;
    }

    /// Mirrors a keystroke from the input box
    pub fn edit_pending_word(&mut self, text: String) {
        self.pending_word = text;
    }

    /// Mirrors the controller after a commit
    pub fn sync_submission(&mut self, controller: &SubmissionController) {
        if self.pending_word != controller.pending_word() {
            self.set_pending_word_from_store(String::from(controller.pending_word()));
        }

        self.accepted_words = controller.accepted_words().to_vec();
    }

    fn set_pending_word_from_store(&mut self, text: String) {
        self.pending_word = text;
        self.pending_word_revision += 1;
    }

    pub fn cue_appended(&mut self, appended: &NewWordAppended) {
        self.appended_cue = Some(AppendedCue {
            position: appended.position,
            until_tick: self.timer + APPENDED_CUE_TICKS,
        });
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Applies a fetched aggregate count, unless it was fetched for another room or round.
    /// Returns whether it was applied.
    pub fn apply_word_count(
        &mut self,
        room_id: RoomId,
        round_started_at: DateTime<Utc>,
        count: u64,
    ) -> bool {
        if self.room_id != room_id || self.round_started_at != Some(round_started_at) {
            return false;
        }

        self.word_count = Some(count);

        true
    }

    pub fn tick_timer(&mut self) {
        self.timer += 1;

        if matches!(&self.appended_cue, Some(cue) if cue.until_tick <= self.timer) {
            self.appended_cue = None;
        }
    }
}
