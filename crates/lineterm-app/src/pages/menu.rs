//! Main menu.

use super::{PageId, PageIntent, cycle};
use crate::KeyInput;

/// Main menu entries, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Friends and groups listing.
    Friends,
    /// End the session and return to a fresh login page.
    Logout,
    /// Terminate.
    Exit,
}

impl MenuItem {
    /// Every entry in display order.
    pub const ALL: [Self; 3] = [Self::Friends, Self::Logout, Self::Exit];

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Friends => "Friends",
            Self::Logout => "Logout",
            Self::Exit => "Exit",
        }
    }
}

/// Post-login menu.
#[derive(Debug, Clone)]
pub struct MenuPage {
    id: PageId,
    selected: usize,
}

impl MenuPage {
    /// Menu with the first entry selected.
    pub fn new(id: PageId) -> Self {
        Self { id, selected: 0 }
    }

    /// Instance id.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Highlighted entry.
    pub fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    pub(crate) fn handle_key(&mut self, key: KeyInput) -> PageIntent {
        match key {
            KeyInput::Down | KeyInput::Tab => {
                self.selected = cycle(self.selected, MenuItem::ALL.len(), true);
                PageIntent::Redraw
            },
            KeyInput::Up | KeyInput::BackTab => {
                self.selected = cycle(self.selected, MenuItem::ALL.len(), false);
                PageIntent::Redraw
            },
            KeyInput::Enter => match self.selected() {
                MenuItem::Friends => PageIntent::OpenTargets,
                MenuItem::Logout => PageIntent::Logout,
                MenuItem::Exit => PageIntent::Quit,
            },
            KeyInput::Esc => PageIntent::Back,
            _ => PageIntent::None,
        }
    }
}
