/// Transport over TCP implementation for a participant to be able to interact with the broker
#[cfg(feature = "client")]
pub mod client;
/// Framing shared by both sides: one JSON document per line
#[cfg(any(feature = "client", feature = "server"))]
pub mod common;
/// Transport over TCP implementation for the broker to interact with a single participant TCP Stream
#[cfg(feature = "server")]
pub mod server;
