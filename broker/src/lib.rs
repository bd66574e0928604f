use std::sync::Arc;

use anyhow::Context;
use tokio::{net::TcpListener, sync::broadcast, task::JoinSet};
use tracing::{info, warn};

use crate::{hub::Hub, ledger::WordLedger};

/// Room-scoped publish/subscribe destinations
pub mod hub;
/// In-memory store of the words participants submitted
pub mod ledger;
mod session;

/// [Broker] relays room events between participants and serves the word ledger.
#[derive(Debug, Clone, Default)]
pub struct Broker {
    hub: Arc<Hub>,
    ledger: Arc<WordLedger>,
}

impl Broker {
    pub fn new() -> Self {
        Broker::default()
    }

    pub fn hub(&self) -> Arc<Hub> {
        self.hub.clone()
    }

    pub fn ledger(&self) -> Arc<WordLedger> {
        self.ledger.clone()
    }

    /// Accepts participants until a quit signal arrives, then waits for every session to close
    pub async fn serve(
        &self,
        listener: TcpListener,
        mut quit_rx: broadcast::Receiver<()>,
    ) -> anyhow::Result<()> {
        let mut join_set: JoinSet<anyhow::Result<()>> = JoinSet::new();
        let addr = listener
            .local_addr()
            .context("listener is not bound to an address")?;

        info!(%addr, "broker listening");
        loop {
            tokio::select! {
                Ok(_) = quit_rx.recv() => {
                    info!("broker interrupted, shutting down");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        info!(%peer, "accepted connection");
                        join_set.spawn(session::handle_session(
                            self.hub.clone(),
                            self.ledger.clone(),
                            quit_rx.resubscribe(),
                            socket,
                        ));
                    }
                    Err(err) => warn!("failed to accept connection: {}", err),
                },
                Some(finished) = join_set.join_next() => log_session_result(finished),
            }
        }

        while let Some(finished) = join_set.join_next().await {
            log_session_result(finished);
        }

        Ok(())
    }
}

fn log_session_result(finished: Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match finished {
        Ok(Ok(())) => (),
        Ok(Err(err)) => warn!("session ended with an error: {:#}", err),
        Err(err) => warn!("session task failed: {}", err),
    }
}
