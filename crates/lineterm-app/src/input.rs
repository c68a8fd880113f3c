//! Terminal-agnostic keyboard input.

/// Keyboard input abstraction.
///
/// Decouples page logic from terminal libraries so the same state machine
/// runs under crossterm and in simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (activate).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Tab key (next widget).
    Tab,
    /// Shift+Tab (previous widget).
    BackTab,
    /// Escape key (back).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Ctrl+U (clear the focused text field).
    ClearLine,
}
