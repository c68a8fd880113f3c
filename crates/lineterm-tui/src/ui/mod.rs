//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into the frame.
//!
//! Every page is drawn in a box covering the middle 80% of the screen, on
//! top of a shaded background.

mod chat;
mod login;
mod menu;
mod pin;
mod targets;
mod widgets;

use lineterm_app::{App, Page};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    widgets::{Clear, Widget},
};

pub use chat::transcript_lines;

/// Background fill character.
const SHADE: &str = "▒";

/// Share of the screen covered by the page box, per axis.
const OVERLAY_PERCENT: u16 = 80;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Shade, area);

    let page_area = overlay(area);
    frame.render_widget(Clear, page_area);

    match app.active_page() {
        Page::Login(page) => login::render(frame, page, page_area),
        Page::PinEntry(page) => pin::render(frame, page, page_area),
        Page::Main(page) => menu::render(frame, page, page_area),
        Page::Targets(page) => targets::render(frame, page, page_area),
        Page::Chat(page) => chat::render(frame, page, page_area),
    }
}

/// Centered rectangle covering [`OVERLAY_PERCENT`] of `area`.
fn overlay(area: Rect) -> Rect {
    let margin = (100 - OVERLAY_PERCENT) / 2;
    let constraints = [
        Constraint::Percentage(margin),
        Constraint::Percentage(OVERLAY_PERCENT),
        Constraint::Percentage(margin),
    ];

    let rows = Layout::default().direction(Direction::Vertical).constraints(constraints).split(area);
    let [_, middle, _] = rows.as_ref() else {
        return area;
    };

    let columns =
        Layout::default().direction(Direction::Horizontal).constraints(constraints).split(*middle);
    let [_, center, _] = columns.as_ref() else {
        return *middle;
    };
    *center
}

/// Fills its area with [`SHADE`].
struct Shade;

impl Widget for Shade {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol(SHADE).set_fg(Color::DarkGray);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use lineterm_app::App;
    use ratatui::{Terminal, backend::TestBackend};

    /// Render `app` into a test terminal and return the screen rows.
    pub fn screen(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| super::render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect()
    }

    /// Whether any row contains `needle`.
    pub fn shows(screen: &[String], needle: &str) -> bool {
        screen.iter().any(|row| row.contains(needle))
    }
}
