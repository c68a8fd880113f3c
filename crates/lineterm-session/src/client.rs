//! External session client seam.
//!
//! The chat service is consumed, not implemented: authentication, token
//! refresh and message transport belong to whatever sits behind these
//! traits. The application only needs the handful of calls below.
//!
//! Implementations are not assumed to be thread-safe. Callers go through
//! [`crate::Session`], which serializes every call behind one lock.

use std::future::Future;

use crate::{ConversationTarget, Message, SessionError};

/// Outcome of a password login.
#[derive(Debug)]
pub enum PasswordLogin<C> {
    /// The client is fully authenticated.
    Authenticated(C),
    /// The service wants out-of-band confirmation on a secondary device.
    /// [`SessionClient::continue_login`] completes the login once the user
    /// has entered `pin_code` there.
    PendingVerification {
        /// Client waiting for confirmation.
        client: C,
        /// Short numeric code to show the user.
        pin_code: String,
    },
}

/// Creates authenticated clients.
pub trait SessionConnector: Send + Sync + 'static {
    /// Client type produced by this connector.
    type Client: SessionClient;

    /// Resume a session from a persisted token.
    fn connect_with_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Self::Client, SessionError>> + Send;

    /// Log in with user id and password. `client_label` names this device to
    /// the service.
    fn connect_with_password(
        &self,
        id: &str,
        password: &str,
        client_label: &str,
    ) -> impl Future<Output = Result<PasswordLogin<Self::Client>, SessionError>> + Send;
}

/// An authenticated (or verification-pending) client handle.
pub trait SessionClient: Send + 'static {
    /// Current session token. `None` until the login has completed.
    fn auth_token(&self) -> Option<String>;

    /// Wait for out-of-band verification and finish the login.
    fn continue_login(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Send a UTF-8 encoded text message.
    fn send_message(
        &mut self,
        target: &ConversationTarget,
        payload: &[u8],
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Up to `count` most recent messages, newest first.
    fn recent_messages(
        &mut self,
        target: &ConversationTarget,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Message>, SessionError>> + Send;

    /// Direct contacts.
    fn contacts(
        &mut self,
    ) -> impl Future<Output = Result<Vec<ConversationTarget>, SessionError>> + Send;

    /// Groups the user belongs to.
    fn groups(&mut self) -> impl Future<Output = Result<Vec<ConversationTarget>, SessionError>> + Send;
}
