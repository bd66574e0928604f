use std::{fmt, sync::Arc};

use comms::RoomId;

use super::{Notifier, Refresher, RoundInfo};

/// Who the participant is shown as; never inspected by the game rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayIdentity {
    pub nickname: String,
}

/// Everything a participant's components need to know about the session they play in,
/// handed to them at construction.
#[derive(Clone)]
pub struct SessionContext {
    pub room_id: RoomId,
    pub round: RoundInfo,
    pub identity: DisplayIdentity,
    /// The aggregate-count refresh action
    pub refresher: Arc<dyn Refresher>,
    pub notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("room_id", &self.room_id)
            .field("round", &self.round)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}
