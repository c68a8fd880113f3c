//! PIN verification page

use lineterm_app::pages::PinPage;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::widgets;

/// Render the PIN prompt with its Cancel button.
pub fn render(frame: &mut Frame, page: &PinPage, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Verification ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let [_, prompt_area, button_area, _] = chunks.as_ref() else {
        return;
    };

    let prompt = Paragraph::new(Line::from(page.prompt()).centered()).wrap(Wrap { trim: true });
    frame.render_widget(prompt, *prompt_area);
    frame.render_widget(Paragraph::new(widgets::button_row(&[("Cancel", true)])), *button_area);
}
