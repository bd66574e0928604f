use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    prelude::{Backend, Rect},
    style::Color,
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state_store::{action::Action, State},
    ui_management::components::{
        input_box::{self, InputBox},
        Component, ComponentRender,
    },
};

struct Props {
    pending_word: String,
    pending_word_revision: u64,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Self {
            pending_word: state.pending_word.clone(),
            pending_word_revision: state.pending_word_revision,
        }
    }
}

/// Mirrors every edit into the store and commits on Enter. The text is taken back from
/// the store only when the store itself rewrote it.
pub struct WordInputBox {
    action_tx: UnboundedSender<Action>,
    /// State Mapped WordInputBox Props
    props: Props,
    // Internal State for the Component
    input_box: InputBox,
}

impl WordInputBox {
    fn commit(&self) {
        let _ = self.action_tx.send(Action::CommitPendingWord);
    }
}

impl Component for WordInputBox {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self {
        let mut input_box = InputBox::new(state, action_tx.clone());
        input_box.set_text(&state.pending_word);

        Self {
            action_tx,
            props: Props::from(state),
            input_box,
        }
    }

    fn move_with_state(mut self, state: &State) -> Self
    where
        Self: Sized,
    {
        let props = Props::from(state);
        if props.pending_word_revision != self.props.pending_word_revision {
            self.input_box.set_text(&props.pending_word);
        }

        Self { props, ..self }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if key.code == KeyCode::Enter {
            self.commit();
            return true;
        }

        let before = String::from(self.input_box.text());
        if !self.input_box.handle_key_event(key) {
            return false;
        }

        if before != self.input_box.text() {
            let _ = self.action_tx.send(Action::EditPendingWord {
                text: String::from(self.input_box.text()),
            });
        }

        true
    }
}

pub struct RenderProps {
    pub area: Rect,
    pub border_color: Color,
}

impl ComponentRender<RenderProps> for WordInputBox {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        self.input_box.render(
            frame,
            input_box::RenderProps {
                title: "Your Word".into(),
                area: props.area,
                border_color: props.border_color,
                show_cursor: true,
            },
        )
    }
}
