//! Conversation view

use lineterm_app::pages::{ChatBody, ChatFocus, ChatLine, ChatPage};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::widgets;

/// Render the transcript, input box and buttons.
pub fn render(frame: &mut Frame, page: &ChatPage, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(format!(" {} ", page.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3), Constraint::Length(1)])
        .split(inner);

    let [transcript_area, input_area, buttons_area] = chunks.as_ref() else {
        return;
    };

    let lines = transcript_lines(page);
    let scroll = lines.len().saturating_sub(usize::from(transcript_area.height));
    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), *transcript_area);

    let focus = page.focus();
    let title = if page.is_closing() { " Closing... " } else { " Message " };
    widgets::text_field(
        frame,
        *input_area,
        title,
        page.input(),
        false,
        !page.is_closing() && focus == ChatFocus::Input,
    );

    let buttons = widgets::button_row(&[
        ("Send", focus == ChatFocus::Send),
        ("Back", focus == ChatFocus::Back),
    ]);
    frame.render_widget(Paragraph::new(buttons), *buttons_area);
}

/// Transcript as styled lines, oldest first.
///
/// The user's own messages are right-aligned; everyone else's are
/// left-aligned and prefixed with the sender's name.
pub fn transcript_lines(page: &ChatPage) -> Vec<Line<'static>> {
    page.lines().iter().map(transcript_line).collect()
}

fn transcript_line(line: &ChatLine) -> Line<'static> {
    let body = match &line.body {
        ChatBody::Text(text) => Span::raw(text.clone()),
        ChatBody::Placeholder(label) => {
            Span::styled(format!("[{label}]"), Style::default().add_modifier(Modifier::REVERSED))
        },
    };

    match &line.author {
        None => Line::from(body).right_aligned(),
        Some(author) => Line::from(vec![
            Span::styled(format!("{author}: "), Style::default().fg(Color::Cyan)),
            body,
        ]),
    }
}
