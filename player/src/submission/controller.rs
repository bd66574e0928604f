use std::sync::Arc;

use chrono::Utc;
use comms::{destination::room_channel, record::WordSubmissionRecord, room_event::CHECK_DB};
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    channel::BroadcastChannel,
    persistence::WordPersistence,
    session::{RoundInfo, SessionContext},
};

use super::{validation, BufferEffect, Rejection, SubmissionOutcome};

const APPENDED_CHANNEL_CAPACITY: usize = 16;

/// Fired every time the accepted words grow, so presentation can scroll to the
/// newest word and play its cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWordAppended {
    pub word: String,
    /// Index of the word within the accepted words
    pub position: usize,
}

/// [SubmissionController] owns the participant's input buffer and the words accepted
/// during the current round. Nothing else mutates either.
pub struct SubmissionController {
    context: SessionContext,
    persistence: Arc<dyn WordPersistence>,
    channel: Arc<dyn BroadcastChannel>,
    pending_word: String,
    accepted_words: Vec<String>,
    appended_tx: broadcast::Sender<NewWordAppended>,
}

impl SubmissionController {
    pub fn new(
        context: SessionContext,
        persistence: Arc<dyn WordPersistence>,
        channel: Arc<dyn BroadcastChannel>,
    ) -> Self {
        let (appended_tx, _) = broadcast::channel(APPENDED_CHANNEL_CAPACITY);

        SubmissionController {
            context,
            persistence,
            channel,
            pending_word: String::new(),
            accepted_words: Vec::new(),
            appended_tx,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn pending_word(&self) -> &str {
        &self.pending_word
    }

    /// Accepted words in submission order
    pub fn accepted_words(&self) -> &[String] {
        &self.accepted_words
    }

    /// Keystrokes land here; they never trigger validation
    pub fn edit_pending_word(&mut self, text: impl Into<String>) {
        self.pending_word = text.into();
    }

    pub fn subscribe_appended(&self) -> broadcast::Receiver<NewWordAppended> {
        self.appended_tx.subscribe()
    }

    /// Submits whatever the input buffer holds
    pub fn commit(&mut self) -> SubmissionOutcome {
        let raw = self.pending_word.clone();

        self.submit_candidate(&raw)
    }

    pub fn submit_candidate(&mut self, raw: &str) -> SubmissionOutcome {
        match validation::validate(raw, &self.context.round.keyword, &self.accepted_words) {
            Ok(()) => {
                self.accept(raw);
                SubmissionOutcome::Accepted(String::from(raw))
            }
            Err(rejection) => {
                self.reject(raw, rejection);
                SubmissionOutcome::Rejected(rejection)
            }
        }
    }

    /// Starts a new round: the previous round's words and input are discarded
    pub fn begin_round(&mut self, round: RoundInfo) {
        debug!(room_id = self.context.room_id, keyword = %round.keyword, "beginning a new round");

        self.context.round = round;
        self.accepted_words.clear();
        self.pending_word.clear();
    }

    fn reject(&mut self, raw: &str, rejection: Rejection) {
        match rejection.buffer_effect() {
            BufferEffect::Keep => (),
            BufferEffect::Clear => self.pending_word.clear(),
            BufferEffect::Truncate(length) => self.pending_word = raw.chars().take(length).collect(),
        }

        debug!(room_id = self.context.room_id, ?rejection, "rejected a candidate");
        self.context
            .notifier
            .notify(rejection.severity(), rejection.message());
    }

    fn accept(&mut self, raw: &str) {
        let room_id = self.context.room_id;
        let word = String::from(raw);

        self.accepted_words.push(word.clone());
        // nobody watching the cue is fine
        let _ = self.appended_tx.send(NewWordAppended {
            word: word.clone(),
            position: self.accepted_words.len() - 1,
        });

        let record = WordSubmissionRecord {
            word,
            elapsed_ms: self.context.round.elapsed_ms(Utc::now()),
            room_id,
        };
        let persisted = self.persistence.persist_word(record);
        tokio::spawn(async move {
            match persisted.await {
                Ok(()) => debug!(room_id, "word handed over to the ledger"),
                Err(err) => warn!(room_id, "could not persist word: {:#}", err),
            }
        });

        // published only after the persistence call is under way
        if let Err(err) =
            self.channel
                .publish(&room_channel(room_id), CHECK_DB, json!({ "roomId": room_id }))
        {
            warn!(room_id, "could not publish resync: {:#}", err);
        }

        self.pending_word.clear();
    }
}
