use std::{future::Future, pin::Pin};

use comms::{record::WordSubmissionRecord, RoomId};

/// A result that arrives later, boxed so collaborators can be used as trait objects
pub type Pending<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;

/// Remote write API for accepted words.
pub trait WordPersistence: Send + Sync {
    /// Hands the record over before returning. The returned future only reports
    /// how the hand-over went and may be dropped without cancelling it.
    fn persist_word(&self, record: WordSubmissionRecord) -> Pending<()>;
}

/// Authoritative source of a room's aggregate word count.
pub trait WordCountSource: Send + Sync {
    fn fetch_word_count(&self, room_id: RoomId) -> Pending<u64>;
}
