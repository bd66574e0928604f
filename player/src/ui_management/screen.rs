use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;
use ratatui::{prelude::Backend, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, State};

use super::{
    components::{Component, ComponentRender},
    pages::{connect_page::ConnectPage, game_page::GamePage},
};

/// The page owning the terminal, decided by whether a round is being played.
///
/// Every round gets a fresh [GamePage], so nothing typed or listed in a previous
/// round leaks into the next one. Losing the broker ends the round and falls back
/// to the lobby.
pub(super) enum Screen {
    Lobby(ConnectPage),
    Round {
        started_at: DateTime<Utc>,
        page: GamePage,
    },
}

impl Screen {
    pub fn new(state: &State, action_tx: &UnboundedSender<Action>) -> Self {
        match state.round_started_at {
            Some(started_at) => Screen::Round {
                started_at,
                page: GamePage::new(state, action_tx.clone()),
            },
            None => Screen::Lobby(ConnectPage::new(state, action_tx.clone())),
        }
    }

    /// Carries the current page over to the new snapshot, or swaps it when the round changed
    pub fn advance(self, state: &State, action_tx: &UnboundedSender<Action>) -> Self {
        match (self, state.round_started_at) {
            (Screen::Round { started_at, page }, Some(current)) if started_at == current => {
                Screen::Round {
                    started_at,
                    page: page.move_with_state(state),
                }
            }
            (Screen::Lobby(page), None) => Screen::Lobby(page.move_with_state(state)),
            _ => Screen::new(state, action_tx),
        }
    }

    pub fn round_started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Screen::Lobby(_) => None,
            Screen::Round { started_at, .. } => Some(*started_at),
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        match self {
            Screen::Lobby(page) => page.handle_key_event(key),
            Screen::Round { page, .. } => page.handle_key_event(key),
        }
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>) {
        match self {
            Screen::Lobby(page) => page.render(frame, ()),
            Screen::Round { page, .. } => page.render(frame, ()),
        }
    }
}
