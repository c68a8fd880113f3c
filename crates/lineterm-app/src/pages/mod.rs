//! Pages of the terminal UI.
//!
//! Each page owns its widget state and turns key presses into a
//! [`PageIntent`]. Navigation and side effects are decided by the
//! [`crate::App`], which owns the stack.

mod chat;
mod login;
mod menu;
mod pin;
mod targets;

use std::fmt;

pub use chat::{ChatBody, ChatFocus, ChatLine, ChatPage};
use lineterm_session::ConversationTarget;
pub use login::{LoginFocus, LoginPage, LoginPhase};
pub use menu::{MenuItem, MenuPage};
pub use pin::PinPage;
pub use targets::{TargetEntry, TargetsPage};

/// Identity of one page instance. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(u64);

impl PageId {
    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Severity of a status line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Progress information.
    Info,
    /// Something the user should notice (logout, cancellation).
    Warn,
    /// A failure.
    Error,
}

/// Status line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Severity.
    pub level: StatusLevel,
    /// Text shown to the user.
    pub text: String,
}

impl Status {
    /// Informational status.
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Info, text: text.into() }
    }

    /// Warning status.
    pub fn warn(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Warn, text: text.into() }
    }

    /// Error status.
    pub fn error(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Error, text: text.into() }
    }
}

/// Which kind of page is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Credential prompt.
    Login,
    /// Waiting for out-of-band PIN confirmation.
    PinEntry,
    /// Main menu.
    Main,
    /// Friends and groups listing.
    Targets,
    /// Conversation view.
    Chat,
}

/// A page on the navigation stack.
#[derive(Debug, Clone)]
pub enum Page {
    /// Credential prompt.
    Login(LoginPage),
    /// PIN verification.
    PinEntry(PinPage),
    /// Main menu.
    Main(MenuPage),
    /// Friends and groups listing.
    Targets(TargetsPage),
    /// Conversation view.
    Chat(ChatPage),
}

impl Page {
    /// Instance id.
    pub fn id(&self) -> PageId {
        match self {
            Self::Login(page) => page.id(),
            Self::PinEntry(page) => page.id(),
            Self::Main(page) => page.id(),
            Self::Targets(page) => page.id(),
            Self::Chat(page) => page.id(),
        }
    }

    /// Page kind.
    pub fn kind(&self) -> PageKind {
        match self {
            Self::Login(_) => PageKind::Login,
            Self::PinEntry(_) => PageKind::PinEntry,
            Self::Main(_) => PageKind::Main,
            Self::Targets(_) => PageKind::Targets,
            Self::Chat(_) => PageKind::Chat,
        }
    }
}

/// What a key press on a page asks the App to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageIntent {
    /// Nothing changed.
    None,
    /// Widget state changed.
    Redraw,
    /// Leave this page.
    Back,
    /// Terminate the application.
    Quit,
    /// Log in with the entered credentials.
    SubmitLogin { id: String, password: String },
    /// Abort the pending PIN verification.
    CancelVerification,
    /// Open the friends and groups listing.
    OpenTargets,
    /// Drop the session and return to a fresh login page.
    Logout,
    /// Open a conversation.
    OpenChat(ConversationTarget),
    /// Send text to the open conversation.
    SendMessage { target: ConversationTarget, text: String },
    /// Start closing the conversation view.
    CloseChat,
}

/// Move a focus index by one step, wrapping around `len` entries.
pub(crate) fn cycle(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward { (index + 1) % len } else { (index + len - 1) % len }
}
