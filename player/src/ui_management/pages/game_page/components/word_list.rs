use ratatui::{
    prelude::{Backend, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    state_store::{action::Action, State},
    ui_management::components::{Component, ComponentRender},
};

struct Props {
    accepted_words: Vec<String>,
    /// Position of the word to flash after it was appended
    highlighted: Option<usize>,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Self {
            accepted_words: state.accepted_words.clone(),
            highlighted: state.appended_cue.as_ref().map(|cue| cue.position),
        }
    }
}

/// The participant's accepted words, always scrolled to the newest one
pub struct WordList {
    props: Props,
}

fn calculate_list_offset(height: u16, items_len: usize) -> usize {
    // go back by (container height - 2 for borders) to get the offset
    items_len.saturating_sub((height as usize).saturating_sub(2))
}

impl Component for WordList {
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

impl ComponentRender<RenderProps> for WordList {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let offset = calculate_list_offset(props.area.height, self.props.accepted_words.len());

        let items: Vec<ListItem> = self
            .props
            .accepted_words
            .iter()
            .enumerate()
            .skip(offset)
            .map(|(position, word)| {
                let style = if self.props.highlighted == Some(position) {
                    Style::default()
                        .bg(Color::Rgb(255, 223, 102))
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(Span::raw(format!("{:>3}. {}", position + 1, word))))
                    .style(style)
            })
            .collect();

        let word_list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Your Words ({})", self.props.accepted_words.len())),
        );
        frame.render_widget(word_list, props.area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_offset_keeps_the_tail_visible() {
        assert_eq!(calculate_list_offset(10, 3), 0);
        assert_eq!(calculate_list_offset(10, 8), 0);
        assert_eq!(calculate_list_offset(10, 12), 4);
        assert_eq!(calculate_list_offset(1, 2), 2);
    }
}
