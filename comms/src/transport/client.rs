use tokio::net::TcpStream;

use crate::{command, event};

use super::common::{frame_stream, BoxedStream, FrameWriter};

/// [EventStream] is a stream of [crate::event::BrokerEvent]s sent by the broker
///
/// # Cancel Safety
///
/// This stream is cancel-safe, meaning that it can be used in [tokio::select]
/// without the risk of missing events.
pub type EventStream = BoxedStream<anyhow::Result<event::BrokerEvent>>;

/// [CommandWriter] writes [crate::command::ClientCommand]s to the broker
pub type CommandWriter = FrameWriter<command::ClientCommand>;

/// Splits a TCP stream into a stream of events and a command writer.
///
/// # Arguments
///
/// - `stream` - A [TcpStream] connected to the broker
pub fn split_tcp_stream(stream: TcpStream) -> (EventStream, CommandWriter) {
    let (reader, writer) = stream.into_split();

    (frame_stream(reader, "broker"), CommandWriter::new(writer))
}
