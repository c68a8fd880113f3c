//! Application input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive
//! the [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (Keyboard, Resize) and system ticks.
//! - Session results reported by the [`crate::Bridge`], either directly or
//!   relayed from a background worker.

use lineterm_session::{ConversationTargets, Message, SessionError};

use crate::{KeyInput, PageId};

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Stored credentials, for prefilling the login form.
    CredentialsLoaded {
        /// Stored user id.
        id: Option<String>,
        /// Stored password.
        password: Option<String>,
    },

    /// The stored token is missing or was rejected.
    TokenLoginUnavailable,

    /// A login attempt completed and the session is authenticated.
    LoggedIn,

    /// Password login failed.
    LoginFailed {
        /// Failure reported by the service.
        error: SessionError,
    },

    /// Password login needs out-of-band PIN confirmation.
    VerificationRequired {
        /// Code to show to the user.
        pin_code: String,
    },

    /// PIN confirmation failed.
    VerificationFailed {
        /// PIN page the attempt belonged to.
        page: PageId,
        /// Failure reported by the service.
        error: SessionError,
    },

    /// Groups and contacts arrived.
    TargetsLoaded {
        /// Listing page that asked.
        page: PageId,
        /// Fetched listing.
        targets: ConversationTargets,
    },

    /// Fresh messages for an open conversation.
    MessagesRefreshed {
        /// Chat page the poller belongs to.
        page: PageId,
        /// Recent messages, newest first.
        messages: Vec<Message>,
    },

    /// The poller of a chat page has exited.
    ChatClosed {
        /// Chat page that can now be discarded.
        page: PageId,
    },

    /// A session call failed and the session was torn down.
    SessionFailed {
        /// Failure reported by the service.
        error: SessionError,
    },
}
