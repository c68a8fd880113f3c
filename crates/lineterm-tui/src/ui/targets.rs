//! Friends and groups listing

use lineterm_app::pages::{TargetEntry, TargetsPage};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// Render the listing, or a loading notice until it arrives.
pub fn render(frame: &mut Frame, page: &TargetsPage, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Friends ");

    if !page.is_loaded() {
        let loading = Paragraph::new(Line::styled("Loading...", Style::default().fg(Color::DarkGray)))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    let items: Vec<ListItem> = page
        .entries()
        .into_iter()
        .map(|entry| match entry {
            TargetEntry::Back => ListItem::new("< Back"),
            TargetEntry::Header(text) => ListItem::new(Line::styled(
                text,
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            TargetEntry::Target(target) => ListItem::new(format!("  {}", target.name)),
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(page.selected_row()));
    frame.render_stateful_widget(list, area, &mut state);
}
