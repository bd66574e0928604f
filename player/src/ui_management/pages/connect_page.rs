use comms::RoomId;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, BrokerConnectionStatus, State};

use crate::ui_management::components::{Component, ComponentRender};

struct Props {
    broker_addr: String,
    room_id: RoomId,
    keyword: String,
    nickname: String,
    connection_status: BrokerConnectionStatus,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            broker_addr: state.broker_addr.clone(),
            room_id: state.room_id,
            keyword: state.keyword.clone(),
            nickname: state.nickname.clone(),
            connection_status: state.connection_status.clone(),
        }
    }
}

/// ConnectPage joins the configured room through the broker
pub struct ConnectPage {
    /// Action sender
    pub action_tx: UnboundedSender<Action>,
    /// State Mapped ConnectPage Props
    props: Props,
}

impl Component for ConnectPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        ConnectPage {
            action_tx,
            props: Props::from(state),
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        ConnectPage {
            props: Props::from(state),
            ..self
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match key.code {
            KeyCode::Enter if self.props.connection_status != BrokerConnectionStatus::Connecting => {
                let _ = self.action_tx.send(Action::ConnectToBrokerRequest {
                    addr: self.props.broker_addr.clone(),
                });
            }
            KeyCode::Char('q') => {
                let _ = self.action_tx.send(Action::Exit);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = self.action_tx.send(Action::Exit);
            }
            _ => return false,
        }

        true
    }
}

impl ComponentRender<()> for ConnectPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let [_, vertical_centered, _] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Ratio(1, 3),
                    Constraint::Min(1),
                    Constraint::Ratio(1, 3),
                ]
                .as_ref(),
            )
            .split(frame.size())
        else {
            panic!("The main layout should have 3 chunks")
        };

        let [_, both_centered, _] = *Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                [
                    Constraint::Ratio(1, 4),
                    Constraint::Min(1),
                    Constraint::Ratio(1, 4),
                ]
                .as_ref(),
            )
            .split(vertical_centered)
        else {
            panic!("The horizontal layout should have 3 chunks")
        };

        let [container_session, container_status] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Length(3)].as_ref())
            .split(both_centered)
        else {
            panic!("The centered layout should have 2 chunks")
        };

        let session = Paragraph::new(Text::from(vec![
            Line::from(format!("Broker: {}", self.props.broker_addr)),
            Line::from(format!("Room: #{}", self.props.room_id)),
            Line::from(vec!["Keyword: ".into(), Span::from(self.props.keyword.clone()).bold()]),
            Line::from(format!("Playing as: {}", self.props.nickname)),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Word Race"));
        frame.render_widget(session, container_session);

        let status_line = match &self.props.connection_status {
            BrokerConnectionStatus::Connecting => Line::from("Connecting...".italic()),
            BrokerConnectionStatus::Errored { err } => Line::from(vec![
                Span::from(err.clone()).red(),
                " <Enter>".bold(),
                " to retry.".into(),
            ]),
            _ => Line::from(vec![
                "Press ".into(),
                "<Enter>".bold(),
                " to join, ".into(),
                "<q>".bold(),
                " to exit.".into(),
            ]),
        };
        let status = Paragraph::new(Text::from(status_line)).wrap(Wrap { trim: true });
        frame.render_widget(status, container_status);
    }
}
