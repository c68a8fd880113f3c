//! In-process loopback chat service.
//!
//! Stands in for the remote service so the binary is usable on its own.
//! Password login always asks for PIN verification and confirms it after a
//! short delay. Every message sent gets an echo reply from the other side.
//! Conversations live in memory and are lost on exit; tokens are
//! self-describing so a stored token still works after a restart.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use lineterm_session::{
    ConversationTarget, Message, PasswordLogin, SessionClient, SessionConnector, SessionError,
    TargetKind,
};
use rand::Rng;

/// Delay before a pending verification is confirmed.
const VERIFICATION_DELAY: Duration = Duration::from_secs(3);

/// Prefix of tokens issued by this service.
const TOKEN_PREFIX: &str = "loopback";

#[derive(Debug, Default)]
struct Conversations {
    /// Per conversation id, oldest first.
    history: HashMap<String, Vec<Message>>,
}

/// Connector for the loopback service.
#[derive(Debug, Clone, Default)]
pub struct LoopbackConnector {
    conversations: Arc<Mutex<Conversations>>,
}

impl LoopbackConnector {
    /// Fresh service with empty conversations.
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self, user: String, token: Option<String>) -> LoopbackClient {
        LoopbackClient { conversations: Arc::clone(&self.conversations), user, token }
    }
}

fn issue_token(user: &str) -> String {
    let nonce: u64 = rand::rng().random();
    format!("{TOKEN_PREFIX}.{user}.{nonce:016x}")
}

fn pin_code() -> String {
    format!("{:04}", rand::rng().random_range(0..10_000))
}

/// User a well-formed token was issued to.
fn token_user(token: &str) -> Option<&str> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(TOKEN_PREFIX), Some(user), Some(nonce), None)
            if !user.is_empty() && nonce.len() == 16 =>
        {
            Some(user)
        },
        _ => None,
    }
}

impl SessionConnector for LoopbackConnector {
    type Client = LoopbackClient;

    async fn connect_with_token(&self, token: &str) -> Result<LoopbackClient, SessionError> {
        let user = token_user(token).ok_or_else(|| SessionError::protocol("Invalid token"))?;
        Ok(self.client(user.to_string(), Some(token.to_string())))
    }

    async fn connect_with_password(
        &self,
        id: &str,
        password: &str,
        client_label: &str,
    ) -> Result<PasswordLogin<LoopbackClient>, SessionError> {
        if id.contains('.') || password.is_empty() {
            return Err(SessionError::protocol("Invalid ID or password"));
        }
        tracing::debug!("Loopback login for {id} from {client_label}");
        Ok(PasswordLogin::PendingVerification {
            client: self.client(id.to_string(), None),
            pin_code: pin_code(),
        })
    }
}

/// Client of the loopback service.
#[derive(Debug)]
pub struct LoopbackClient {
    conversations: Arc<Mutex<Conversations>>,
    user: String,
    token: Option<String>,
}

impl LoopbackClient {
    fn conversations(&self) -> MutexGuard<'_, Conversations> {
        self.conversations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionClient for LoopbackClient {
    fn auth_token(&self) -> Option<String> {
        self.token.clone()
    }

    async fn continue_login(&mut self) -> Result<(), SessionError> {
        tokio::time::sleep(VERIFICATION_DELAY).await;
        self.token = Some(issue_token(&self.user));
        Ok(())
    }

    async fn send_message(
        &mut self,
        target: &ConversationTarget,
        payload: &[u8],
    ) -> Result<(), SessionError> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| SessionError::generic(format!("Malformed message: {e}")))?;

        let reply_from = match target.kind {
            TargetKind::Contact => target.name.clone(),
            TargetKind::Group => format!("{} (echo)", target.name),
        };

        let mut conversations = self.conversations();
        let history = conversations.history.entry(target.id.clone()).or_default();
        history.push(Message::own(text));
        history.push(Message::from_sender(reply_from, text));
        Ok(())
    }

    async fn recent_messages(
        &mut self,
        target: &ConversationTarget,
        count: usize,
    ) -> Result<Vec<Message>, SessionError> {
        let conversations = self.conversations();
        let history = conversations.history.get(&target.id).map(Vec::as_slice).unwrap_or_default();
        Ok(history.iter().rev().take(count).cloned().collect())
    }

    async fn contacts(&mut self) -> Result<Vec<ConversationTarget>, SessionError> {
        Ok(vec![
            ConversationTarget::contact("u-ada", "Ada"),
            ConversationTarget::contact("u-grace", "Grace"),
            ConversationTarget::contact("u-linus", "Linus"),
        ])
    }

    async fn groups(&mut self) -> Result<Vec<ConversationTarget>, SessionError> {
        Ok(vec![ConversationTarget::group("g-lobby", "Lobby")])
    }
}
