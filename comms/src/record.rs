use serde::{Deserialize, Serialize};

use crate::RoomId;

/// A single accepted word, as persisted to the word ledger.
///
/// The record is derived at submission time and never stored client side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSubmissionRecord {
    /// The accepted word, exactly as the participant typed it
    pub word: String,
    /// Milliseconds elapsed between the round start and the submission
    #[serde(rename = "time")]
    pub elapsed_ms: i64,
    /// The room the word was submitted in
    #[serde(rename = "roomId")]
    pub room_id: RoomId,
}
