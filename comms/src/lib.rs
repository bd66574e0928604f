/// Set of commands which the broker can receive and process
pub mod command;
/// Helpers for naming broker destinations
pub mod destination;
/// Set of events the broker sends back to a connected participant
pub mod event;
/// Word submission records handed over to the word ledger
pub mod record;
/// Events which participants publish to each other through room destinations
pub mod room_event;
/// Implementation of event and command transportation over TCP Streams.
/// Requires 'server' or 'client' features to be enabled and will bring in tokio dependency alongside with other dependencies
pub mod transport;

/// Numeric identifier of a game room
pub type RoomId = u64;
