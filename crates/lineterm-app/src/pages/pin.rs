//! PIN verification page.

use super::{PageId, PageIntent};
use crate::KeyInput;

/// Shows the PIN the user must confirm on their phone. The only control is
/// Cancel.
#[derive(Debug, Clone)]
pub struct PinPage {
    id: PageId,
    pin_code: String,
}

impl PinPage {
    /// Page showing `pin_code`.
    pub fn new(id: PageId, pin_code: impl Into<String>) -> Self {
        Self { id, pin_code: pin_code.into() }
    }

    /// Instance id.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Code issued by the service.
    pub fn pin_code(&self) -> &str {
        &self.pin_code
    }

    /// Instruction line shown to the user.
    pub fn prompt(&self) -> String {
        format!("Enter PinCode {} to your mobile phone in 2 minutes.", self.pin_code)
    }

    pub(crate) fn handle_key(&mut self, key: KeyInput) -> PageIntent {
        match key {
            KeyInput::Enter | KeyInput::Esc => PageIntent::CancelVerification,
            _ => PageIntent::None,
        }
    }
}
