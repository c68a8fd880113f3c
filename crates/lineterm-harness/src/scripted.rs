//! Scripted chat service.
//!
//! A [`ScriptedService`] is configured up front (accounts, tokens, groups,
//! contacts, message history) and then handed to the runtime as a
//! [`ScriptedConnector`]. The test keeps the service handle to inspect the
//! [`Call`] log, inject failures and release pending PIN verifications.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use lineterm_session::{
    ConversationTarget, Message, PasswordLogin, SessionClient, SessionConnector, SessionError,
};
use tokio::sync::Notify;

/// A call made into the scripted service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Token login.
    ConnectWithToken(String),
    /// Password login.
    ConnectWithPassword {
        /// User id.
        id: String,
        /// Client label reported by the application.
        client_label: String,
    },
    /// Verification wait.
    ContinueLogin,
    /// Outgoing message.
    SendMessage {
        /// Recipient id.
        target: String,
        /// Raw payload.
        payload: Vec<u8>,
    },
    /// History fetch.
    RecentMessages {
        /// Conversation id.
        target: String,
        /// Requested count.
        count: usize,
    },
    /// Contact listing.
    Contacts,
    /// Group listing.
    Groups,
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    pin_code: Option<String>,
}

#[derive(Debug, Default)]
struct ServiceState {
    accounts: HashMap<String, Account>,
    tokens: HashSet<String>,
    issued: u64,
    groups: Vec<ConversationTarget>,
    contacts: Vec<ConversationTarget>,
    /// Per conversation id, oldest first.
    history: HashMap<String, Vec<Message>>,
    calls: Vec<Call>,
    verification_failure: Option<SessionError>,
    fetch_failure: Option<SessionError>,
    send_failure: Option<SessionError>,
    listing_failure: Option<SessionError>,
}

impl ServiceState {
    fn issue_token(&mut self) -> String {
        self.issued += 1;
        let token = format!("token-{}", self.issued);
        self.tokens.insert(token.clone());
        token
    }
}

/// Shared handle to the scripted service.
#[derive(Debug, Clone, Default)]
pub struct ScriptedService {
    state: Arc<Mutex<ServiceState>>,
    verified: Arc<Notify>,
}

impl ScriptedService {
    /// Empty service: no accounts, no tokens.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Account that logs in without verification.
    #[must_use]
    pub fn with_account(self, id: &str, password: &str) -> Self {
        self.state().accounts.insert(id.to_string(), Account {
            password: password.to_string(),
            pin_code: None,
        });
        self
    }

    /// Account whose password login requires PIN verification.
    #[must_use]
    pub fn with_verified_account(self, id: &str, password: &str, pin_code: &str) -> Self {
        self.state().accounts.insert(id.to_string(), Account {
            password: password.to_string(),
            pin_code: Some(pin_code.to_string()),
        });
        self
    }

    /// Token accepted by token login.
    #[must_use]
    pub fn with_token(self, token: &str) -> Self {
        self.state().tokens.insert(token.to_string());
        self
    }

    /// Group listed for every account.
    #[must_use]
    pub fn with_group(self, group: ConversationTarget) -> Self {
        self.state().groups.push(group);
        self
    }

    /// Contact listed for every account.
    #[must_use]
    pub fn with_contact(self, contact: ConversationTarget) -> Self {
        self.state().contacts.push(contact);
        self
    }

    /// Conversation history, oldest first.
    #[must_use]
    pub fn with_history(self, target_id: &str, messages: Vec<Message>) -> Self {
        self.state().history.insert(target_id.to_string(), messages);
        self
    }

    /// Connector for the runtime.
    pub fn connector(&self) -> ScriptedConnector {
        ScriptedConnector { service: self.clone() }
    }

    /// Every call so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Number of history fetches for `target_id`.
    pub fn fetch_count(&self, target_id: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::RecentMessages { target, .. } if target == target_id))
            .count()
    }

    /// Payloads sent so far.
    pub fn sent_payloads(&self) -> Vec<Vec<u8>> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::SendMessage { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    /// Let one pending `continue_login` return.
    pub fn confirm_verification(&self) {
        self.verified.notify_one();
    }

    /// Let one pending `continue_login` fail with `error`.
    pub fn reject_verification(&self, error: SessionError) {
        self.state().verification_failure = Some(error);
        self.verified.notify_one();
    }

    /// Fail the next history fetch.
    pub fn fail_next_fetch(&self, error: SessionError) {
        self.state().fetch_failure = Some(error);
    }

    /// Fail the next send.
    pub fn fail_next_send(&self, error: SessionError) {
        self.state().send_failure = Some(error);
    }

    /// Fail the next group or contact listing.
    pub fn fail_next_listing(&self, error: SessionError) {
        self.state().listing_failure = Some(error);
    }

    /// Append a message from another participant.
    pub fn deliver(&self, target_id: &str, message: Message) {
        self.state().history.entry(target_id.to_string()).or_default().push(message);
    }
}

/// [`SessionConnector`] backed by a [`ScriptedService`].
#[derive(Debug, Clone)]
pub struct ScriptedConnector {
    service: ScriptedService,
}

impl SessionConnector for ScriptedConnector {
    type Client = ScriptedClient;

    async fn connect_with_token(&self, token: &str) -> Result<ScriptedClient, SessionError> {
        let mut state = self.service.state();
        state.calls.push(Call::ConnectWithToken(token.to_string()));
        if !state.tokens.contains(token) {
            return Err(SessionError::protocol("Token expired"));
        }
        drop(state);
        Ok(ScriptedClient { service: self.service.clone(), token: Some(token.to_string()) })
    }

    async fn connect_with_password(
        &self,
        id: &str,
        password: &str,
        client_label: &str,
    ) -> Result<PasswordLogin<ScriptedClient>, SessionError> {
        let mut state = self.service.state();
        state.calls.push(Call::ConnectWithPassword {
            id: id.to_string(),
            client_label: client_label.to_string(),
        });

        let account = match state.accounts.get(id) {
            Some(account) if account.password == password => account.clone(),
            _ => {
                tracing::debug!("Rejected password login for {id}");
                return Err(SessionError::protocol("Invalid ID or password"));
            },
        };

        match account.pin_code {
            Some(pin_code) => {
                let client = ScriptedClient { service: self.service.clone(), token: None };
                Ok(PasswordLogin::PendingVerification { client, pin_code })
            },
            None => {
                let token = state.issue_token();
                Ok(PasswordLogin::Authenticated(ScriptedClient {
                    service: self.service.clone(),
                    token: Some(token),
                }))
            },
        }
    }
}

/// Hand out a failure queued by a test.
fn injected(operation: &str, error: SessionError) -> SessionError {
    tracing::debug!("Injected {operation} failure: {error}");
    error
}

/// [`SessionClient`] backed by a [`ScriptedService`].
#[derive(Debug)]
pub struct ScriptedClient {
    service: ScriptedService,
    token: Option<String>,
}

impl SessionClient for ScriptedClient {
    fn auth_token(&self) -> Option<String> {
        self.token.clone()
    }

    async fn continue_login(&mut self) -> Result<(), SessionError> {
        self.service.state().calls.push(Call::ContinueLogin);
        self.service.verified.notified().await;

        let mut state = self.service.state();
        if let Some(error) = state.verification_failure.take() {
            return Err(injected("verification", error));
        }
        self.token = Some(state.issue_token());
        Ok(())
    }

    async fn send_message(
        &mut self,
        target: &ConversationTarget,
        payload: &[u8],
    ) -> Result<(), SessionError> {
        let mut state = self.service.state();
        state.calls.push(Call::SendMessage { target: target.id.clone(), payload: payload.to_vec() });
        if let Some(error) = state.send_failure.take() {
            return Err(injected("send", error));
        }
        let text = String::from_utf8_lossy(payload).into_owned();
        state.history.entry(target.id.clone()).or_default().push(Message::own(text));
        Ok(())
    }

    async fn recent_messages(
        &mut self,
        target: &ConversationTarget,
        count: usize,
    ) -> Result<Vec<Message>, SessionError> {
        let mut state = self.service.state();
        state.calls.push(Call::RecentMessages { target: target.id.clone(), count });
        if let Some(error) = state.fetch_failure.take() {
            return Err(injected("fetch", error));
        }
        let history = state.history.get(&target.id).map(Vec::as_slice).unwrap_or_default();
        Ok(history.iter().rev().take(count).cloned().collect())
    }

    async fn contacts(&mut self) -> Result<Vec<ConversationTarget>, SessionError> {
        let mut state = self.service.state();
        state.calls.push(Call::Contacts);
        if let Some(error) = state.listing_failure.take() {
            return Err(injected("listing", error));
        }
        Ok(state.contacts.clone())
    }

    async fn groups(&mut self) -> Result<Vec<ConversationTarget>, SessionError> {
        let mut state = self.service.state();
        state.calls.push(Call::Groups);
        if let Some(error) = state.listing_failure.take() {
            return Err(injected("listing", error));
        }
        Ok(state.groups.clone())
    }
}
