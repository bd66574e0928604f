use std::sync::{Arc, Mutex};

use comms::{record::WordSubmissionRecord, RoomId};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    channel::{BroadcastChannel, MessageHandler, Subscription},
    persistence::{Pending, WordPersistence},
    session::{DisplayIdentity, Notification, Notifier, Refresher, RoundInfo, SessionContext, Severity},
};

/// Ordered record of every collaborator call, shared by the fakes of one test
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn taken(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock().unwrap())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.notifications.lock().unwrap().push(Notification {
            severity,
            message: message.to_string(),
        });
    }
}

/// Reports every refresh on a channel the test can await
#[derive(Debug)]
pub struct SignallingRefresher(pub mpsc::UnboundedSender<()>);

impl SignallingRefresher {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (Arc::new(SignallingRefresher(tx)), rx)
    }
}

impl Refresher for SignallingRefresher {
    fn refresh(&self) {
        let _ = self.0.send(());
    }
}

#[derive(Debug, Default)]
pub struct RecordingPersistence {
    pub log: CallLog,
    pub records: Mutex<Vec<WordSubmissionRecord>>,
    pub fail: bool,
}

impl WordPersistence for RecordingPersistence {
    fn persist_word(&self, record: WordSubmissionRecord) -> Pending<()> {
        self.log.push(format!("persist:{}", record.word));
        self.records.lock().unwrap().push(record);

        let fail = self.fail;
        Box::pin(async move {
            if fail {
                anyhow::bail!("ledger unavailable");
            }
            Ok(())
        })
    }
}

#[derive(Debug, Default)]
pub struct RecordingChannel {
    pub log: CallLog,
    pub published: Mutex<Vec<(String, String, Value)>>,
}

impl BroadcastChannel for RecordingChannel {
    fn publish(&self, destination: &str, event_type: &str, payload: Value) -> anyhow::Result<()> {
        self.log.push(format!("publish:{}", event_type));
        self.published.lock().unwrap().push((
            destination.to_string(),
            event_type.to_string(),
            payload,
        ));

        Ok(())
    }

    fn subscribe(&self, _destination: &str, _handler: MessageHandler) -> anyhow::Result<Subscription> {
        anyhow::bail!("the recording channel does not deliver")
    }
}

pub fn context(
    room_id: RoomId,
    round: RoundInfo,
    refresher: Arc<dyn Refresher>,
    notifier: Arc<dyn Notifier>,
) -> SessionContext {
    SessionContext {
        room_id,
        round,
        identity: DisplayIdentity {
            nickname: "tester".to_string(),
        },
        refresher,
        notifier,
    }
}
