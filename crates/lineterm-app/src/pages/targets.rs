//! Friends and groups listing.

use lineterm_session::{ConversationTarget, ConversationTargets};

use super::{PageId, PageIntent};
use crate::KeyInput;

const PAGE_STEP: usize = 10;

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetEntry<'a> {
    /// Return to the menu.
    Back,
    /// Section header, e.g. `Groups(3)`. Not selectable.
    Header(String),
    /// A group or contact.
    Target(&'a ConversationTarget),
}

impl TargetEntry<'_> {
    /// Whether the selection may rest on this row.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Self::Header(_))
    }
}

/// Listing of groups and contacts, fetched on every visit.
#[derive(Debug, Clone)]
pub struct TargetsPage {
    id: PageId,
    targets: Option<ConversationTargets>,
    selected: usize,
}

impl TargetsPage {
    /// Page waiting for its fetch.
    pub fn new(id: PageId) -> Self {
        Self { id, targets: None, selected: 0 }
    }

    /// Instance id.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Whether the listing has arrived.
    pub fn is_loaded(&self) -> bool {
        self.targets.is_some()
    }

    /// Install the fetched listing.
    pub fn set_targets(&mut self, targets: ConversationTargets) {
        self.targets = Some(targets);
        self.selected = 0;
    }

    /// Rows in display order: Back, groups, then contacts.
    pub fn entries(&self) -> Vec<TargetEntry<'_>> {
        let mut entries = vec![TargetEntry::Back];
        if let Some(targets) = &self.targets {
            entries.push(TargetEntry::Header(format!("Groups({})", targets.groups.len())));
            entries.extend(targets.groups.iter().map(TargetEntry::Target));
            entries.push(TargetEntry::Header(format!("Friends({})", targets.contacts.len())));
            entries.extend(targets.contacts.iter().map(TargetEntry::Target));
        }
        entries
    }

    /// Index into [`Self::entries`] of the highlighted row.
    pub fn selected_row(&self) -> usize {
        self.selectable_rows().get(self.selected).copied().unwrap_or(0)
    }

    fn selectable_rows(&self) -> Vec<usize> {
        self.entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_selectable())
            .map(|(row, _)| row)
            .collect()
    }

    fn move_selection(&mut self, delta: isize) -> PageIntent {
        let count = self.selectable_rows().len();
        let last = count.saturating_sub(1);
        let next = self.selected.saturating_add_signed(delta).min(last);
        if next == self.selected {
            return PageIntent::None;
        }
        self.selected = next;
        PageIntent::Redraw
    }

    pub(crate) fn handle_key(&mut self, key: KeyInput) -> PageIntent {
        match key {
            KeyInput::Down | KeyInput::Tab => self.move_selection(1),
            KeyInput::Up | KeyInput::BackTab => self.move_selection(-1),
            KeyInput::PageDown => self.move_selection(PAGE_STEP as isize),
            KeyInput::PageUp => self.move_selection(-(PAGE_STEP as isize)),
            KeyInput::Home => self.move_selection(isize::MIN),
            KeyInput::End => self.move_selection(isize::MAX),
            KeyInput::Esc => PageIntent::Back,
            KeyInput::Enter => {
                let row = self.selected_row();
                match self.entries().get(row) {
                    Some(TargetEntry::Target(target)) => PageIntent::OpenChat((*target).clone()),
                    Some(TargetEntry::Back) => PageIntent::Back,
                    Some(TargetEntry::Header(_)) | None => PageIntent::None,
                }
            },
            _ => PageIntent::None,
        }
    }
}
