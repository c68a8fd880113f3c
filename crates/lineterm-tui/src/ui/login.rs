//! Login page

use lineterm_app::{
    Status,
    pages::{LoginFocus, LoginPage, LoginPhase},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
};

use super::widgets;

const FIELD_HEIGHT: u16 = 3;

/// Render the login form.
pub fn render(frame: &mut Frame, page: &LoginPage, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Login ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let [_, id_area, password_area, _, buttons_area, status_area, _] = chunks.as_ref() else {
        return;
    };

    let focus = page.focus();
    let editable = !page.is_busy();
    widgets::text_field(
        frame,
        *id_area,
        " ID ",
        page.user_id(),
        false,
        editable && focus == LoginFocus::UserId,
    );
    widgets::text_field(
        frame,
        *password_area,
        " Password ",
        page.password(),
        true,
        editable && focus == LoginFocus::Password,
    );

    let buttons = widgets::button_row(&[
        ("Login", focus == LoginFocus::Login),
        ("Exit", focus == LoginFocus::Exit),
    ]);
    frame.render_widget(Paragraph::new(buttons), *buttons_area);

    let resuming = Status::info("Resuming session...");
    let status = match (page.status(), page.phase()) {
        (None, LoginPhase::AttemptingTokenLogin) => Some(&resuming),
        (status, _) => status,
    };
    frame.render_widget(Paragraph::new(widgets::status_line(status)), *status_area);
}

#[cfg(test)]
mod tests {
    use lineterm_app::{App, AppEvent, KeyInput};

    use crate::ui::test_support::{screen, shows};

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let _ = app.handle(AppEvent::Key(KeyInput::Char(c)));
        }
    }

    #[test]
    fn password_is_masked() {
        let mut app = App::new();
        let _ = app.start();
        let _ = app.handle(AppEvent::TokenLoginUnavailable);
        type_text(&mut app, "alice");
        let _ = app.handle(AppEvent::Key(KeyInput::Tab));
        type_text(&mut app, "secret");

        let rows = screen(&app, 60, 20);

        assert!(shows(&rows, "alice"));
        assert!(shows(&rows, "******"));
        assert!(!shows(&rows, "secret"));
        assert!(shows(&rows, "[ Login ]"));
    }

    #[test]
    fn token_login_shows_progress() {
        let mut app = App::new();
        let _ = app.start();

        assert!(shows(&screen(&app, 60, 20), "Resuming session..."));
    }

    #[test]
    fn error_status_is_shown() {
        let mut app = App::new();
        let _ = app.start();
        let _ = app.handle(AppEvent::TokenLoginUnavailable);
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));

        assert!(shows(&screen(&app, 60, 20), "ID is required"));
    }
}
