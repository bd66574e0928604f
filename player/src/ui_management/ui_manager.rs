use std::{
    io::{self, Stdout},
    time::Duration,
};

use anyhow::Context;
use crossterm::{
    event::{Event, EventStream, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver},
};
use tokio_stream::StreamExt;
use tracing::debug;

use crate::{
    state_store::{action::Action, State},
    Interrupted,
};

use super::screen::Screen;

/// Redraws at least this often, so the round timer moves without new state
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Raw mode and the alternate screen, held for as long as the UI runs and given back
/// on drop, error paths included
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn acquire() -> anyhow::Result<Self> {
        let mut stdout = io::stdout();

        enable_raw_mode().context("could not enable raw mode")?;
        execute!(stdout, EnterAlternateScreen)?;

        Ok(TerminalGuard {
            terminal: Terminal::new(CrosstermBackend::new(stdout))?,
        })
    }

    fn draw(&mut self, screen: &Screen) -> anyhow::Result<()> {
        self.terminal
            .draw(|frame| screen.render(frame))
            .context("could not render to the terminal")?;

        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// [UiManager] turns key presses into actions and store snapshots into frames.
pub struct UiManager {
    action_tx: mpsc::UnboundedSender<Action>,
}

impl UiManager {
    pub fn new() -> (Self, UnboundedReceiver<Action>) {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        (Self { action_tx }, action_rx)
    }

    fn on_key(&self, screen: &mut Screen, key: KeyEvent) {
        if !screen.handle_key_event(key) {
            debug!(?key, "key not bound on this page");
        }
    }

    pub async fn main_loop(
        self,
        mut state_rx: UnboundedReceiver<State>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        // the store publishes its initial state before anything else
        let mut screen = {
            let state = state_rx
                .recv()
                .await
                .context("the state store stopped before the first state")?;

            Screen::new(&state, &self.action_tx)
        };

        let mut terminal = TerminalGuard::acquire()?;
        let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
        let mut crossterm_events = EventStream::new();

        loop {
            tokio::select! {
                _ = redraw.tick() => (),
                maybe_event = crossterm_events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => self.on_key(&mut screen, key),
                    Some(Ok(_)) => (),
                    Some(Err(err)) => return Err(anyhow::Error::from(err).context("could not read terminal events")),
                    None => return Ok(Interrupted::UserInt),
                },
                maybe_state = state_rx.recv() => match maybe_state {
                    Some(state) => screen = screen.advance(&state, &self.action_tx),
                    // the store is gone, nothing left to show
                    None => return Ok(Interrupted::UserInt),
                },
                Ok(interrupted) = interrupt_rx.recv() => return Ok(interrupted),
            }

            terminal.draw(&screen)?;
        }
    }
}
