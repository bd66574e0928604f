pub use self::controller::{NewWordAppended, SubmissionController};
pub use self::validation::{validate, BufferEffect, Rejection, MAX_WORD_LENGTH};

mod controller;
mod validation;

/// Result of committing a candidate word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted(String),
    Rejected(Rejection),
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted(_))
    }
}
