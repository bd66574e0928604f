use chrono::{DateTime, Utc};
use comms::RoomId;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::session::{Notification, Notifier, Refresher, Severity};

/// Requests raised from outside the store's loop: by the session collaborators or by
/// the tasks it detaches
#[derive(Debug)]
pub(super) enum Signal {
    RefreshWordCount,
    WordCountFetched {
        room_id: RoomId,
        round_started_at: DateTime<Utc>,
        count: anyhow::Result<u64>,
    },
    Notify(Notification),
}

/// The refresh action, run by the store on its own loop
#[derive(Debug, Clone)]
pub(super) struct SignalRefresher(pub UnboundedSender<Signal>);

impl Refresher for SignalRefresher {
    fn refresh(&self) {
        // the store is gone once the app is shutting down
        let _ = self.0.send(Signal::RefreshWordCount);
    }
}

#[derive(Debug, Clone)]
pub(super) struct SignalNotifier(pub UnboundedSender<Signal>);

impl Notifier for SignalNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => warn!(%severity, "{}", message),
            _ => info!(%severity, "{}", message),
        }

        let _ = self.0.send(Signal::Notify(Notification {
            severity,
            message: String::from(message),
        }));
    }
}
