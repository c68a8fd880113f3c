//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from the terminal.
//! Each frontend implements it to provide input and rendering, while the
//! generic [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use crate::{App, AppEvent};

/// Abstracts terminal I/O for the application runtime.
///
/// # Implementations
///
/// - **TUI**: crossterm event stream and a ratatui terminal
/// - **Simulation**: injected events and recorded renders
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input event.
    ///
    /// Returns `None` when the input source is exhausted.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release terminal resources.
    fn stop(&mut self);
}
