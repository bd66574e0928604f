use std::sync::Arc;

use comms::{
    command::ClientCommand,
    event::{BrokerEvent, WelcomeReplyEvent},
    transport,
};
use nanoid::nanoid;
use tokio::{net::TcpStream, sync::broadcast};
use tokio_stream::StreamExt;
use tracing::{info, warn};

use crate::{hub::Hub, ledger::WordLedger};

use self::relay_session::RelaySession;

mod relay_session;

/// Why a session loop stopped
enum SessionEnd {
    /// The participant quit or closed the stream, its subscriptions must be released
    Left,
    /// The broker is shutting down, nobody is left to notify
    Shutdown,
}

/// Given a tcp stream, handles the participant session
/// until the participant quits, the tcp stream is closed for some reason, or the broker shuts down
pub async fn handle_session(
    hub: Arc<Hub>,
    ledger: Arc<WordLedger>,
    mut quit_rx: broadcast::Receiver<()>,
    stream: TcpStream,
) -> anyhow::Result<()> {
    let session_id = nanoid!();
    let (mut commands, mut event_writer) = transport::server::split_tcp_stream(stream);

    event_writer
        .write(&BrokerEvent::Welcome(WelcomeReplyEvent {
            session_id: session_id.clone(),
        }))
        .await?;
    info!(%session_id, "participant connected");

    let mut relay_session = RelaySession::new(&session_id, hub, ledger);

    let result: anyhow::Result<SessionEnd> = loop {
        tokio::select! {
            cmd = commands.next() => match cmd {
                None | Some(Ok(ClientCommand::Quit(_))) => break Ok(SessionEnd::Left),
                Some(Ok(cmd)) => {
                    if let Some(reply) = relay_session.handle_command(cmd).await {
                        if let Err(err) = event_writer.write(&reply).await {
                            break Err(err);
                        }
                    }
                }
                // a broken frame is the participant's problem, keep serving the rest
                Some(Err(err)) => warn!(%session_id, "dropping malformed command: {:#}", err),
            },
            Some(event) = relay_session.recv() => {
                if let Err(err) = event_writer.write(&event).await {
                    break Err(err);
                }
            }
            Ok(_) = quit_rx.recv() => break Ok(SessionEnd::Shutdown),
        }
    };

    match result {
        Ok(SessionEnd::Shutdown) => {
            info!(%session_id, "closing session for shutdown");
            Ok(())
        }
        other => {
            // the other participants of the room must stop counting this session
            relay_session.leave_all().await;
            info!(%session_id, "participant left");
            other.map(|_| ())
        }
    }
}
