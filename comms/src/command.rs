use serde::{Deserialize, Serialize};

use crate::{record::WordSubmissionRecord, RoomId};

/// Command for subscribing to a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribeCommand {
    // The destination to receive deliveries from.
    #[serde(rename = "d")]
    pub destination: String,
}

/// Command for unsubscribing from a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsubscribeCommand {
    // The destination to stop receiving deliveries from.
    #[serde(rename = "d")]
    pub destination: String,
}

/// Command for publishing a body to every subscriber of a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishCommand {
    // The destination to publish to.
    #[serde(rename = "d")]
    pub destination: String,
    // The raw body, delivered to subscribers untouched.
    #[serde(rename = "b")]
    pub body: String,
}

/// Command for reading the aggregate word count of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchWordCountCommand {
    #[serde(rename = "roomId")]
    pub room_id: RoomId,
}

/// Command for quitting the whole broker session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuitCommand;

/// A command which can be sent to the broker by a single participant connection.
/// Commands of one connection are processed in the order they were written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_ct", rename_all = "snake_case")]
pub enum ClientCommand {
    Subscribe(SubscribeCommand),
    Unsubscribe(UnsubscribeCommand),
    Publish(PublishCommand),
    PersistWord(WordSubmissionRecord),
    FetchWordCount(FetchWordCountCommand),
    Quit(QuitCommand),
}
