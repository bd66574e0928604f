use comms::RoomId;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, State};

use self::components::{
    notification_feed::{self, NotificationFeed},
    word_input_box::{self, WordInputBox},
    word_list::{self, WordList},
};
use crate::ui_management::components::{Component, ComponentRender};

mod components;

struct Props {
    room_id: RoomId,
    keyword: String,
    nickname: String,
    /// Aggregate count across the room
    word_count: Option<u64>,
    /// Seconds since the round was joined
    timer: usize,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            room_id: state.room_id,
            keyword: state.keyword.clone(),
            nickname: state.nickname.clone(),
            word_count: state.word_count,
            timer: state.timer,
        }
    }
}

/// GamePage is where words are typed and submitted during a round
pub struct GamePage {
    /// Action sender
    pub action_tx: UnboundedSender<Action>,
    /// State Mapped GamePage Props
    props: Props,
    // Child Components
    word_list: WordList,
    notification_feed: NotificationFeed,
    word_input_box: WordInputBox,
}

impl Component for GamePage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        GamePage {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            word_list: WordList::new(state, action_tx.clone()),
            notification_feed: NotificationFeed::new(state, action_tx.clone()),
            word_input_box: WordInputBox::new(state, action_tx),
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        GamePage {
            props: Props::from(state),
            // propogate the update to the child components
            word_list: self.word_list.move_with_state(state),
            notification_feed: self.notification_feed.move_with_state(state),
            word_input_box: self.word_input_box.move_with_state(state),
            ..self
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        let wants_exit = key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
        if wants_exit {
            let _ = self.action_tx.send(Action::Exit);
            return true;
        }

        // every printable key belongs to the word input
        self.word_input_box.handle_key_event(key)
    }
}

impl ComponentRender<()> for GamePage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let [container_header, container_body, container_input, container_help] =
            *Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(3),
                        Constraint::Min(1),
                        Constraint::Length(3),
                        Constraint::Length(1),
                    ]
                    .as_ref(),
                )
                .split(frame.size())
        else {
            panic!("The main layout should have 4 chunks")
        };

        let word_count = self
            .props
            .word_count
            .map(|count| count.to_string())
            .unwrap_or_else(|| String::from("-"));
        let header = Paragraph::new(Text::from(Line::from(vec![
            Span::from(format!("#{}", self.props.room_id)).bold(),
            " keyword ".into(),
            Span::from(self.props.keyword.clone()).bold().yellow(),
            format!(" | room total: {}", word_count).into(),
            format!(" | {} secs", self.props.timer).into(),
        ])))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Playing as @{}", self.props.nickname)),
        );
        frame.render_widget(header, container_header);

        let [container_words, container_notifications] = *Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
            .split(container_body)
        else {
            panic!("The body layout should have 2 chunks")
        };

        self.word_list.render(
            frame,
            word_list::RenderProps {
                area: container_words,
            },
        );
        self.notification_feed.render(
            frame,
            notification_feed::RenderProps {
                area: container_notifications,
            },
        );
        self.word_input_box.render(
            frame,
            word_input_box::RenderProps {
                area: container_input,
                border_color: Color::Yellow,
            },
        );

        let help = Paragraph::new(Text::from(Line::from(vec![
            "<Enter>".bold(),
            " to submit, ".into(),
            "<Esc>".bold(),
            " to exit.".into(),
        ])));
        frame.render_widget(help, container_help);
    }
}
