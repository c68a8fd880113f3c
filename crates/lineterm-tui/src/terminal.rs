//! Crossterm-backed [`Driver`].
//!
//! Key presses and resizes come from the crossterm event stream; frames
//! are drawn with ratatui.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use lineterm_app::{App, AppEvent, Driver, KeyInput};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::ui;

/// Failure talking to the terminal.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Reading input or writing a frame failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Driver for a real terminal.
///
/// Raw mode and mouse capture on the alternate screen are set up on
/// construction and undone on [`Driver::stop`] or drop, whichever comes
/// first.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    restored: bool,
}

impl TerminalDriver {
    /// Take over the terminal.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?.execute(EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, restored: false })
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let _ = self.terminal.show_cursor();
        let _ = disable_raw_mode();
        let _ = stdout().execute(DisableMouseCapture);
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

/// Convert a crossterm key event to `KeyInput`.
pub fn convert_key(key: KeyEvent) -> Option<KeyInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('u') => Some(KeyInput::ClearLine),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::BackTab => Some(KeyInput::BackTab),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        KeyCode::PageUp => Some(KeyInput::PageUp),
        KeyCode::PageDown => Some(KeyInput::PageDown),
        _ => None,
    }
}

/// Convert a mouse event to `KeyInput`. The wheel pages lists; everything
/// else is ignored.
pub fn convert_mouse(mouse: MouseEvent) -> Option<KeyInput> {
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(KeyInput::PageUp),
        MouseEventKind::ScrollDown => Some(KeyInput::PageDown),
        _ => None,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        loop {
            match self.event_stream.next().await {
                Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                    if let Some(key) = convert_key(key_event) {
                        return Ok(Some(AppEvent::Key(key)));
                    }
                },
                Some(Ok(Event::Mouse(mouse))) => {
                    if let Some(key) = convert_mouse(mouse) {
                        return Ok(Some(AppEvent::Key(key)));
                    }
                },
                Some(Ok(Event::Resize(cols, rows))) => {
                    return Ok(Some(AppEvent::Resize(cols, rows)));
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(TerminalError::Io(e)),
                None => return Ok(None),
            }
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        self.restore();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.restore();
    }
}
