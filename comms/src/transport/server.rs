use tokio::net::TcpStream;

use crate::{command, event};

use super::common::{frame_stream, BoxedStream, FrameWriter};

/// [CommandStream] is a stream of [crate::command::ClientCommand]s sent by a participant
///
/// # Cancel Safety
///
/// This stream is cancel-safe, meaning that it can be used in [tokio::select!]
/// without the risk of missing commands.
pub type CommandStream = BoxedStream<anyhow::Result<command::ClientCommand>>;

/// [EventWriter] writes [crate::event::BrokerEvent]s to a participant
pub type EventWriter = FrameWriter<event::BrokerEvent>;

/// Splits a TCP stream into a stream of commands and an event writer.
///
/// # Arguments
///
/// - `stream` - A [TcpStream] accepted from a participant
pub fn split_tcp_stream(stream: TcpStream) -> (CommandStream, EventWriter) {
    let (reader, writer) = stream.into_split();

    (frame_stream(reader, "participant"), EventWriter::new(writer))
}
