//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use lineterm_session::ConversationTarget;

use crate::PageId;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Load stored credentials and try to resume the session from the
    /// stored token.
    TokenLogin,

    /// Load stored credentials to prefill a fresh login page.
    LoadCredentials,

    /// Log in interactively.
    PasswordLogin {
        /// User id.
        id: String,
        /// Password.
        password: String,
    },

    /// Start waiting for out-of-band PIN confirmation.
    StartVerification {
        /// PIN page the attempt belongs to.
        page: PageId,
    },

    /// Abandon the pending PIN confirmation.
    CancelVerification {
        /// PIN page the attempt belongs to.
        page: PageId,
    },

    /// Fetch groups and contacts for a listing page.
    FetchTargets {
        /// Listing page waiting for the result.
        page: PageId,
    },

    /// Start polling a conversation.
    OpenChat {
        /// Chat page showing the conversation.
        page: PageId,
        /// Conversation to poll.
        target: ConversationTarget,
    },

    /// Stop polling a conversation. Answered with
    /// [`crate::AppEvent::ChatClosed`] once the poller has exited.
    CloseChat {
        /// Chat page being closed.
        page: PageId,
    },

    /// Send a text message.
    SendMessage {
        /// Recipient.
        target: ConversationTarget,
        /// Message text.
        text: String,
    },

    /// Stop workers and drop the authenticated session.
    EndSession,
}
