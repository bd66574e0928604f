use serde::{Deserialize, Serialize};

use crate::RoomId;

/// The broker has accepted the connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelcomeReplyEvent {
    /// The id the broker assigned to this connection
    #[serde(rename = "s")]
    pub session_id: String,
}

/// A body was published to a destination the connection subscribes to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBroadcastEvent {
    /// The destination the body was published to
    #[serde(rename = "d")]
    pub destination: String,
    /// The published body, absent when the publisher sent nothing
    #[serde(rename = "b", default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// The aggregate word count of a room, as a reply to a fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCountReplyEvent {
    #[serde(rename = "roomId")]
    pub room_id: RoomId,
    /// Number of words stored for the room
    #[serde(rename = "n")]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
/// Events that can be sent to a participant
/// Reply events answer one of the participant's own commands, broadcast events may originate from anyone
pub enum BrokerEvent {
    Welcome(WelcomeReplyEvent),
    Message(MessageBroadcastEvent),
    WordCount(WordCountReplyEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    // given an event enum, and an expect string, asserts that event is serialized / deserialized appropiately
    fn assert_event_serialization(event: &BrokerEvent, expected: &str) {
        let serialized = serde_json::to_string(&event).unwrap();
        assert_eq!(serialized, expected);
        let deserialized: BrokerEvent = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, *event);
    }

    #[test]
    fn test_welcome_event() {
        let event = BrokerEvent::Welcome(WelcomeReplyEvent {
            session_id: "abc".to_string(),
        });

        assert_event_serialization(&event, r#"{"t":"welcome","s":"abc"}"#);
    }

    #[test]
    fn test_message_event() {
        let event = BrokerEvent::Message(MessageBroadcastEvent {
            destination: "/queue/manager.room.1".to_string(),
            body: Some("{}".to_string()),
        });

        assert_event_serialization(
            &event,
            r#"{"t":"message","d":"/queue/manager.room.1","b":"{}"}"#,
        );
    }

    #[test]
    fn test_message_event_without_body() {
        let event = BrokerEvent::Message(MessageBroadcastEvent {
            destination: "/queue/manager.room.1".to_string(),
            body: None,
        });

        assert_event_serialization(&event, r#"{"t":"message","d":"/queue/manager.room.1"}"#);
    }

    #[test]
    fn test_word_count_event() {
        let event = BrokerEvent::WordCount(WordCountReplyEvent {
            room_id: 3,
            count: 12,
        });

        assert_event_serialization(&event, r#"{"t":"word_count","roomId":3,"n":12}"#);
    }
}
