use std::{fs::File, sync::Mutex};

use anyhow::Context;
use clap::Parser;
use player::{
    config::Settings, create_termination, state_store::StateStore, ui_management::UiManager,
    Interrupted,
};
use tracing_subscriber::EnvFilter;

fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    // the terminal belongs to the ui, so logs only ever go to a file
    let Some(path) = settings.log_file.as_ref() else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("could not create the log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PLAYER_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    init_logging(&settings)?;

    let (terminator, interrupt_rx) = create_termination();
    let (state_store, state_rx) = StateStore::new(&settings);
    let (ui_manager, action_rx) = UiManager::new();

    let (reason, _) = tokio::try_join!(
        state_store.main_loop(terminator, action_rx, interrupt_rx.resubscribe()),
        ui_manager.main_loop(state_rx, interrupt_rx.resubscribe()),
    )?;

    match reason {
        Interrupted::UserInt => println!("exited per user request"),
        Interrupted::OsSigInt => println!("exited because of an os sig int"),
    }

    Ok(())
}
