use ratatui::{
    prelude::{Backend, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    session::{Notification, Severity},
    state_store::{action::Action, State},
    ui_management::components::{Component, ComponentRender},
};

struct Props {
    /// Oldest first
    notifications: Vec<Notification>,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Self {
            notifications: state.notifications.asc_iter().cloned().collect(),
        }
    }
}

pub struct NotificationFeed {
    props: Props,
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Cyan,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

impl Component for NotificationFeed {
    fn new(state: &State, _action_tx: UnboundedSender<Action>) -> Self {
        Self {
            props: Props::from(state),
        }
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        Self {
            props: Props::from(state),
        }
    }
}

pub struct RenderProps {
    pub area: Rect,
}

impl ComponentRender<RenderProps> for NotificationFeed {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let lines: Vec<Line> = self
            .props
            .notifications
            .iter()
            .map(|notification| {
                Line::from(vec![
                    Span::styled(
                        format!("[{}] ", notification.severity),
                        Style::default().fg(severity_color(notification.severity)),
                    )
                    .bold(),
                    Span::raw(notification.message.clone()),
                ])
            })
            .collect();

        let feed = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Notifications"));
        frame.render_widget(feed, props.area);
    }
}
