use comms::{
    command::{self, ClientCommand},
    event::{self, BrokerEvent},
    record::WordSubmissionRecord,
    transport,
};
use tokio::net::{TcpListener, TcpStream};
use tokio_stream::StreamExt;

#[tokio::test]
async fn assert_broker_participant_transport() {
    // bind to an ephemeral port so parallel test runs never collide
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind to a port");
    let addr = listener.local_addr().expect("listener has no local addr");

    let (broker_collected_commands, participant_collected_events) =
        tokio::join!(execute_broker(listener), execute_participant(addr.to_string()));

    assert_eq!(
        broker_collected_commands.unwrap(),
        vec![
            ClientCommand::Subscribe(command::SubscribeCommand {
                destination: "/queue/manager.room.7".into(),
            }),
            ClientCommand::PersistWord(WordSubmissionRecord {
                word: "banana".into(),
                elapsed_ms: 42,
                room_id: 7,
            }),
            ClientCommand::Publish(command::PublishCommand {
                destination: "/queue/manager.room.7".into(),
                body: r#"{"type":"CHECK_DB","roomId":7}"#.into(),
            }),
        ]
    );

    assert_eq!(
        participant_collected_events.unwrap(),
        vec![
            BrokerEvent::Welcome(event::WelcomeReplyEvent {
                session_id: "session-id-1".into(),
            }),
            BrokerEvent::Message(event::MessageBroadcastEvent {
                destination: "/queue/manager.room.7".into(),
                body: None,
            }),
        ]
    );
}

async fn execute_broker(listener: TcpListener) -> anyhow::Result<Vec<ClientCommand>> {
    // accept the only participant connection we will have
    let tcp_stream = match listener.accept().await {
        Ok((tcp_stream, _addr)) => tcp_stream,
        Err(e) => return Err(anyhow::anyhow!("failed to accept participant: {}", e)),
    };

    let (mut command_stream, mut event_writer) = transport::server::split_tcp_stream(tcp_stream);
    let mut collected_commands = Vec::new();

    event_writer
        .write(&BrokerEvent::Welcome(event::WelcomeReplyEvent {
            session_id: "session-id-1".into(),
        }))
        .await?;
    // a delivery without a body must survive the trip as `None`
    event_writer
        .write(&BrokerEvent::Message(event::MessageBroadcastEvent {
            destination: "/queue/manager.room.7".into(),
            body: None,
        }))
        .await?;

    // listen for commands from the participant until the connection is closed
    while let Some(result) = command_stream.next().await {
        match result {
            Ok(command) => collected_commands.push(command),
            Err(e) => return Err(anyhow::anyhow!("failed to read command: {}", e)),
        }
    }

    Ok(collected_commands)
}

async fn execute_participant(addr: String) -> anyhow::Result<Vec<BrokerEvent>> {
    let tcp_stream = match TcpStream::connect(addr).await {
        Ok(tcp_stream) => tcp_stream,
        Err(e) => return Err(anyhow::anyhow!("failed to connect to broker: {}", e)),
    };

    let (mut event_stream, mut command_writer) = transport::client::split_tcp_stream(tcp_stream);
    let mut collected_events = Vec::new();

    for _ in 0..2 {
        match event_stream.next().await {
            Some(Ok(event)) => collected_events.push(event),
            Some(Err(e)) => return Err(anyhow::anyhow!("could not parse event: {}", e)),
            None => return Err(anyhow::anyhow!("broker closed the connection")),
        }
    }

    command_writer
        .write(&ClientCommand::Subscribe(command::SubscribeCommand {
            destination: "/queue/manager.room.7".into(),
        }))
        .await?;
    command_writer
        .write(&ClientCommand::PersistWord(WordSubmissionRecord {
            word: "banana".into(),
            elapsed_ms: 42,
            room_id: 7,
        }))
        .await?;
    command_writer
        .write(&ClientCommand::Publish(command::PublishCommand {
            destination: "/queue/manager.room.7".into(),
            body: r#"{"type":"CHECK_DB","roomId":7}"#.into(),
        }))
        .await?;

    // dropping the writer closes our half so the broker side sees EOF
    drop(command_writer);

    Ok(collected_events)
}
