//! Main menu

use lineterm_app::pages::{MenuItem, MenuPage};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Render the main menu.
pub fn render(frame: &mut Frame, page: &MenuPage, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" lineterm ");
    let items: Vec<ListItem> = MenuItem::ALL.iter().map(|item| ListItem::new(item.label())).collect();
    let selected = MenuItem::ALL.iter().position(|item| *item == page.selected());

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}
