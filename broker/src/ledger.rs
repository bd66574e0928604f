use std::collections::HashMap;

use comms::{record::WordSubmissionRecord, RoomId};
use tokio::sync::Mutex;

/// [WordLedger] is the in-memory word store the broker serves to participants.
///
/// Records are kept per room in arrival order. Nothing is deduplicated and nothing
/// outlives the process.
#[derive(Debug, Default)]
pub struct WordLedger {
    rooms: Mutex<HashMap<RoomId, Vec<WordSubmissionRecord>>>,
}

impl WordLedger {
    pub fn new() -> Self {
        WordLedger::default()
    }

    pub async fn record(&self, record: WordSubmissionRecord) {
        self.rooms
            .lock()
            .await
            .entry(record.room_id)
            .or_default()
            .push(record);
    }

    /// Aggregate word count of a room
    pub async fn count(&self, room_id: RoomId) -> u64 {
        self.rooms
            .lock()
            .await
            .get(&room_id)
            .map(|records| records.len() as u64)
            .unwrap_or(0)
    }

    /// Words of a room, in the order they were recorded
    pub async fn words(&self, room_id: RoomId) -> Vec<String> {
        self.rooms
            .lock()
            .await
            .get(&room_id)
            .map(|records| records.iter().map(|r| r.word.clone()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str, room_id: RoomId) -> WordSubmissionRecord {
        WordSubmissionRecord {
            word: word.into(),
            elapsed_ms: 0,
            room_id,
        }
    }

    #[tokio::test]
    async fn test_counts_are_per_room() {
        let ledger = WordLedger::new();

        ledger.record(record("banana", 1)).await;
        ledger.record(record("cherry", 1)).await;
        ledger.record(record("banana", 2)).await;

        assert_eq!(ledger.count(1).await, 2);
        assert_eq!(ledger.count(2).await, 1);
        assert_eq!(ledger.count(3).await, 0);
        assert_eq!(ledger.words(1).await, vec!["banana", "cherry"]);
    }

    #[tokio::test]
    async fn test_duplicates_across_participants_are_kept() {
        let ledger = WordLedger::new();

        ledger.record(record("banana", 1)).await;
        ledger.record(record("banana", 1)).await;

        assert_eq!(ledger.count(1).await, 2);
    }
}
