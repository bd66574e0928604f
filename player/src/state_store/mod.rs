pub use self::state::{AppendedCue, BrokerConnectionStatus, State};
pub use self::state_store::StateStore;

pub mod action;
mod game_session;
mod signal;
mod state;
mod state_store;
