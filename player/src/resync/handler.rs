use std::sync::Arc;

use comms::room_event::RoomEvent;
use tracing::{debug, error};

use crate::session::{Notifier, Refresher, Severity};

/// A broadcast body which could not be turned into a room event
#[derive(Debug, thiserror::Error)]
pub enum TransportAnomaly {
    #[error("got empty message")]
    EmptyBody,
    #[error("got malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// What handling a single delivery amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Refreshed,
    Ignored,
    Anomaly,
}

/// Stateless per-message logic of the resync listener
#[derive(Clone)]
pub struct ResyncHandler {
    refresher: Arc<dyn Refresher>,
    notifier: Arc<dyn Notifier>,
}

impl ResyncHandler {
    pub fn new(refresher: Arc<dyn Refresher>, notifier: Arc<dyn Notifier>) -> Self {
        ResyncHandler {
            refresher,
            notifier,
        }
    }

    pub fn handle(&self, body: Option<&str>) -> Disposition {
        match decode(body) {
            Ok(RoomEvent::CheckDb { room_id }) => {
                debug!(?room_id, "room asked for a resync");
                self.refresher.refresh();
                Disposition::Refreshed
            }
            Ok(RoomEvent::Unknown) => Disposition::Ignored,
            Err(anomaly) => {
                error!("broadcast delivery dropped: {}", anomaly);
                self.notifier.notify(Severity::Error, &anomaly.to_string());
                Disposition::Anomaly
            }
        }
    }
}

fn decode(body: Option<&str>) -> Result<RoomEvent, TransportAnomaly> {
    match body {
        Some(body) if !body.trim().is_empty() => Ok(serde_json::from_str(body)?),
        _ => Err(TransportAnomaly::EmptyBody),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingNotifier, SignallingRefresher};

    fn handler() -> (
        ResyncHandler,
        tokio::sync::mpsc::UnboundedReceiver<()>,
        Arc<RecordingNotifier>,
    ) {
        let (refresher, refreshes) = SignallingRefresher::new();
        let notifier = Arc::new(RecordingNotifier::default());

        (
            ResyncHandler::new(refresher, notifier.clone()),
            refreshes,
            notifier,
        )
    }

    #[test]
    fn test_check_db_refreshes_once() {
        let (handler, mut refreshes, notifier) = handler();

        assert_eq!(
            handler.handle(Some(r#"{"type":"CHECK_DB","roomId":7}"#)),
            Disposition::Refreshed
        );
        assert!(refreshes.try_recv().is_ok());
        assert!(refreshes.try_recv().is_err());
        assert!(notifier.taken().is_empty());
    }

    #[test]
    fn test_check_db_without_room_still_refreshes() {
        let (handler, mut refreshes, _) = handler();

        assert_eq!(
            handler.handle(Some(r#"{"type":"CHECK_DB"}"#)),
            Disposition::Refreshed
        );
        assert!(refreshes.try_recv().is_ok());
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let (handler, mut refreshes, notifier) = handler();

        assert_eq!(
            handler.handle(Some(r#"{"type":"UNKNOWN","extra":[1,2]}"#)),
            Disposition::Ignored
        );
        assert!(refreshes.try_recv().is_err());
        assert!(notifier.taken().is_empty());
    }

    #[test]
    fn test_empty_bodies_notify_an_error() {
        let (handler, mut refreshes, notifier) = handler();

        assert_eq!(handler.handle(None), Disposition::Anomaly);
        assert_eq!(handler.handle(Some("")), Disposition::Anomaly);

        let notifications = notifier.taken();
        assert_eq!(notifications.len(), 2);
        assert!(notifications
            .iter()
            .all(|n| n.severity == Severity::Error && n.message == "got empty message"));
        assert!(refreshes.try_recv().is_err());
    }

    #[test]
    fn test_malformed_bodies_notify_an_error() {
        let (handler, _, notifier) = handler();

        assert_eq!(handler.handle(Some("{not json")), Disposition::Anomaly);
        assert_eq!(handler.handle(Some(r#"{"roomId":7}"#)), Disposition::Anomaly);
        assert_eq!(notifier.taken().len(), 2);
    }
}
