//! Small shared pieces: buttons, text fields and the status line.

use lineterm_app::{Status, StatusLevel, TextInput};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Button label, reversed when focused.
pub fn button(label: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default()
    };
    Span::styled(format!("[ {label} ]"), style)
}

/// Row of buttons, centered.
pub fn button_row(buttons: &[(&str, bool)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(buttons.len() * 2);
    for (i, (label, focused)) in buttons.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(button(label, *focused));
    }
    Line::from(spans).centered()
}

/// Bordered single-line text field. Places the cursor when focused.
pub fn text_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    input: &TextInput,
    masked: bool,
    focused: bool,
) {
    let text = if masked { "*".repeat(input.text().chars().count()) } else { input.text().to_string() };
    let border = if focused { Style::default().fg(Color::Yellow) } else { Style::default() };

    let block = Block::default().borders(Borders::ALL).border_style(border).title(title.to_string());
    let inner_width = area.width.saturating_sub(2);
    let cursor = input.cursor() as u16;
    let scroll = cursor.saturating_sub(inner_width.saturating_sub(1));

    frame.render_widget(Paragraph::new(text).block(block).scroll((0, scroll)), area);

    if focused {
        let x = area.x.saturating_add(1).saturating_add(cursor - scroll);
        frame.set_cursor_position((x, area.y.saturating_add(1)));
    }
}

/// Style for a status line message.
pub fn status_style(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => Style::default().fg(Color::Cyan),
        StatusLevel::Warn => Style::default().fg(Color::Yellow),
        StatusLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

/// Centered status line. Blank when `status` is `None`.
pub fn status_line(status: Option<&Status>) -> Line<'static> {
    match status {
        Some(status) => Line::styled(status.text.clone(), status_style(status.level)).centered(),
        None => Line::default(),
    }
}
