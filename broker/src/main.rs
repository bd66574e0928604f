use anyhow::Context;
use broker::Broker;
use clap::Parser;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BROKER_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let listener = TcpListener::bind(("0.0.0.0", settings.port))
        .await
        .with_context(|| format!("could not bind to port {}", settings.port))?;
    let (quit_tx, quit_rx) = broadcast::channel::<()>(1);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = quit_tx.send(());
        }
    });

    Broker::new().serve(listener, quit_rx).await?;
    info!("broker shut down");

    Ok(())
}
