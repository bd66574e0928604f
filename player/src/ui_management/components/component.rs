use crossterm::event::KeyEvent;
use ratatui::{prelude::Backend, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, State};

/// Mirrors the part of [State] it shows and is rebuilt from every snapshot the store publishes.
pub trait Component {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized;
    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized;

    /// Returns whether the key was used. Unused keys fall through to the enclosing page.
    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        let _ = key;

        false
    }
}

pub trait ComponentRender<Props> {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: Props);
}
