/// Room-wide publish/subscribe used for resync notifications
pub mod channel;
/// Connection to the relay broker, standing in for every remote collaborator
pub mod client;
pub mod config;
/// Remote write API and aggregate count source
pub mod persistence;
/// Standing subscription which refreshes the aggregate count on room resyncs
pub mod resync;
/// What a participant's components know about the session they play in
pub mod session;
/// Single task owning the game session and publishing immutable state snapshots
pub mod state_store;
/// Validation and the accept transition of candidate words
pub mod submission;
mod termination;
pub mod ui_management;

pub use termination::{create_termination, Interrupted, Terminator};

#[cfg(test)]
pub(crate) mod test_support;
