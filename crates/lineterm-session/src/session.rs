//! Session context shared by the foreground loop and background workers.
//!
//! One [`Session`] exists per authenticated login. It is handed around as an
//! `Arc` and dropped on logout or teardown; nothing about it is global.

use std::sync::{Mutex as StdMutex, PoisonError};

use tokio::sync::Mutex;

use crate::{
    ConversationTarget, ConversationTargets, InputHistory, Message, SessionClient, SessionError,
};

/// Authenticated client handle plus its synchronization and input history.
///
/// Every call into the client goes through the async lock, so at most one
/// remote call is in flight per session. Nothing times out: a hung call
/// blocks every other caller until it returns.
pub struct Session<C> {
    client: Mutex<C>,
    history: StdMutex<InputHistory>,
}

impl<C: SessionClient> Session<C> {
    /// Wrap a client with the default history capacity.
    pub fn new(client: C) -> Self {
        Self::with_history(client, InputHistory::default())
    }

    /// Wrap a client with an explicit history.
    pub fn with_history(client: C, history: InputHistory) -> Self {
        Self { client: Mutex::new(client), history: StdMutex::new(history) }
    }

    /// Append submitted text to the bounded input history.
    pub fn record_input(&self, text: &str) {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).push(text);
    }

    /// Snapshot of the input history.
    pub fn history(&self) -> InputHistory {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current session token.
    pub async fn auth_token(&self) -> Option<String> {
        self.client.lock().await.auth_token()
    }

    /// Finish a login that is waiting for out-of-band verification.
    pub async fn continue_login(&self) -> Result<(), SessionError> {
        self.client.lock().await.continue_login().await
    }

    /// Send `text` to `target`.
    ///
    /// The payload is the UTF-8 encoding of `text`; `&str` guarantees it is
    /// well-formed, so no character is ever dropped or replaced.
    pub async fn send_message(
        &self,
        target: &ConversationTarget,
        text: &str,
    ) -> Result<(), SessionError> {
        let payload = text.as_bytes();
        let mut client = self.client.lock().await;
        client.send_message(target, payload).await
    }

    /// Up to `count` recent messages of `target`, newest first.
    pub async fn recent_messages(
        &self,
        target: &ConversationTarget,
        count: usize,
    ) -> Result<Vec<Message>, SessionError> {
        self.client.lock().await.recent_messages(target, count).await
    }

    /// Groups and contacts, fetched under a single lock acquisition.
    pub async fn conversation_targets(&self) -> Result<ConversationTargets, SessionError> {
        let mut client = self.client.lock().await;
        let groups = client.groups().await?;
        let contacts = client.contacts().await?;
        Ok(ConversationTargets { groups, contacts })
    }
}

impl<C> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
