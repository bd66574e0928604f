use serde::{Deserialize, Serialize};

use crate::RoomId;

/// Event type asking every participant to recompute the aggregate word count
pub const CHECK_DB: &str = "CHECK_DB";

/// Events published to a room destination, discriminated by their `type` field.
///
/// Types this client does not know about decode into [RoomEvent::Unknown] so that
/// newer publishers never break older listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoomEvent {
    /// Some participant changed the authoritative word ledger
    #[serde(rename = "CHECK_DB")]
    CheckDb {
        #[serde(rename = "roomId", default, skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomId>,
    },
    #[serde(other)]
    Unknown,
}
