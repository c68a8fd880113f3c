//! Session-to-Application translation layer.
//!
//! The [`Bridge`] owns everything the pure [`crate::App`] must not: the
//! connector, the authenticated [`Session`], the credential file and the
//! background workers.
//!
//! # Responsibilities
//!
//! - Executes session-related [`crate::AppAction`]s and converts the outcome
//!   into [`crate::AppEvent`]s.
//! - Persists credentials after every successful login.
//! - Keeps at most one verification worker and at most one poller alive, and
//!   joins the poller before its page may be discarded.
//! - Filters [`WorkerEvent`]s: reports for a cancelled attempt or a page that
//!   is no longer polled are dropped here, before the App sees them.
//! - Tears the session down on any failure outside the login flow.

use std::sync::Arc;

use lineterm_session::{
    CredentialStore, Credentials, InputHistory, PasswordLogin, Session, SessionConnector,
    SessionError,
};
use tokio::sync::mpsc;

use crate::{
    AppAction, AppEvent, Config, PageId,
    worker::{self, WorkerEvent, WorkerHandle},
};

/// A password login waiting for out-of-band confirmation.
struct PendingLogin<C> {
    session: Arc<Session<C>>,
    id: String,
    password: String,
    worker: Option<WorkerHandle>,
}

impl<C> PendingLogin<C> {
    fn is_for(&self, page: PageId) -> bool {
        self.worker.as_ref().is_some_and(|worker| worker.page() == page)
    }

    fn abandon(self) {
        if let Some(worker) = self.worker {
            worker.detach();
        }
    }
}

/// Bridge between the App and the external session client.
///
/// Generic over the connector so production and simulation share the same
/// login, polling and teardown logic.
pub struct Bridge<K: SessionConnector> {
    connector: K,
    config: Config,
    store: CredentialStore,
    session: Option<Arc<Session<K::Client>>>,
    pending: Option<PendingLogin<K::Client>>,
    poller: Option<WorkerHandle>,
    events: mpsc::UnboundedSender<WorkerEvent>,
}

impl<K: SessionConnector> Bridge<K> {
    /// Create a bridge. Workers report on `events`.
    pub fn new(connector: K, config: Config, events: mpsc::UnboundedSender<WorkerEvent>) -> Self {
        let store = CredentialStore::new(config.credentials_path.clone());
        Self { connector, config, store, session: None, pending: None, poller: None, events }
    }

    /// Authenticated session. `None` while logged out.
    pub fn session(&self) -> Option<&Arc<Session<K::Client>>> {
        self.session.as_ref()
    }

    /// Chat page whose poller is running.
    pub fn polling_page(&self) -> Option<PageId> {
        self.poller.as_ref().map(WorkerHandle::page)
    }

    /// Whether a verification worker is waiting for confirmation.
    pub fn is_verifying(&self) -> bool {
        self.pending.as_ref().is_some_and(|pending| pending.worker.is_some())
    }

    /// Credential file used by this bridge.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Session connector.
    pub fn connector(&self) -> &K {
        &self.connector
    }

    /// Process an App action and return resulting App events.
    pub async fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        match action {
            AppAction::TokenLogin => self.token_login().await,
            AppAction::LoadCredentials => {
                let stored = self.store.load();
                vec![AppEvent::CredentialsLoaded { id: stored.id, password: stored.password }]
            },
            AppAction::PasswordLogin { id, password } => self.password_login(id, password).await,
            AppAction::StartVerification { page } => {
                if let Some(pending) = self.pending.as_mut() {
                    let session = Arc::clone(&pending.session);
                    let handle = worker::spawn_verification(session, page, self.events.clone());
                    if let Some(previous) = pending.worker.replace(handle) {
                        previous.detach();
                    }
                } else {
                    tracing::warn!("No pending login to verify for {page}");
                }
                vec![]
            },
            AppAction::CancelVerification { page } => {
                if self.pending.as_ref().is_some_and(|pending| pending.is_for(page))
                    && let Some(pending) = self.pending.take()
                {
                    tracing::info!("Verification for {page} cancelled");
                    pending.abandon();
                }
                vec![]
            },
            AppAction::FetchTargets { page } => {
                let Some(session) = self.session.clone() else {
                    return self.session_failed(not_logged_in()).await;
                };
                match session.conversation_targets().await {
                    Ok(targets) => vec![AppEvent::TargetsLoaded { page, targets }],
                    Err(error) => self.session_failed(error).await,
                }
            },
            AppAction::OpenChat { page, target } => {
                let Some(session) = self.session.clone() else {
                    return self.session_failed(not_logged_in()).await;
                };
                self.stop_poller().await;
                self.poller = Some(worker::spawn_polling(
                    session,
                    page,
                    target,
                    self.config.poll_interval,
                    self.events.clone(),
                ));
                vec![]
            },
            AppAction::CloseChat { page } => {
                if self.polling_page() == Some(page) {
                    self.stop_poller().await;
                }
                vec![AppEvent::ChatClosed { page }]
            },
            AppAction::SendMessage { target, text } => {
                let Some(session) = self.session.clone() else {
                    return self.session_failed(not_logged_in()).await;
                };
                session.record_input(&text);
                match session.send_message(&target, &text).await {
                    Ok(()) => vec![],
                    Err(error) => self.session_failed(error).await,
                }
            },
            AppAction::EndSession => {
                self.teardown().await;
                vec![]
            },
            AppAction::Render | AppAction::Quit => vec![],
        }
    }

    /// Translate a worker report into App events.
    ///
    /// Reports for pages that are no longer served are dropped.
    pub async fn handle_worker_event(&mut self, event: WorkerEvent) -> Vec<AppEvent> {
        match event {
            WorkerEvent::MessagesFetched { page, messages } => {
                if self.polling_page() != Some(page) {
                    tracing::debug!("Dropping messages for stopped poller of {page}");
                    return vec![];
                }
                vec![AppEvent::MessagesRefreshed { page, messages }]
            },
            WorkerEvent::PollingFailed { page, error } => {
                if self.polling_page() != Some(page) {
                    tracing::debug!("Dropping polling failure for stopped poller of {page}");
                    return vec![];
                }
                self.session_failed(error).await
            },
            WorkerEvent::VerificationFinished { page, result } => {
                if !self.pending.as_ref().is_some_and(|pending| pending.is_for(page)) {
                    tracing::debug!("Dropping verification result for abandoned {page}");
                    return vec![];
                }
                let Some(pending) = self.pending.take() else {
                    return vec![];
                };
                match result {
                    Ok(()) => {
                        let PendingLogin { session, id, password, .. } = pending;
                        self.complete_login(session, Some(id), Some(password)).await;
                        vec![AppEvent::LoggedIn]
                    },
                    Err(error) => {
                        tracing::info!("Verification for {page} failed: {error}");
                        vec![AppEvent::VerificationFailed { page, error }]
                    },
                }
            },
        }
    }

    /// Stop every worker and drop the session.
    pub async fn shutdown(&mut self) {
        self.teardown().await;
    }

    async fn token_login(&mut self) -> Vec<AppEvent> {
        let stored = self.store.load();
        let mut events = vec![AppEvent::CredentialsLoaded {
            id: stored.id.clone(),
            password: stored.password.clone(),
        }];

        let Some(token) = stored.session_token.as_deref() else {
            tracing::info!("No stored session token");
            events.push(AppEvent::TokenLoginUnavailable);
            return events;
        };

        match self.connector.connect_with_token(token).await {
            Ok(client) => {
                let session = Arc::new(self.new_session(client));
                self.complete_login(session, stored.id, stored.password).await;
                events.push(AppEvent::LoggedIn);
            },
            Err(error) => {
                tracing::info!("Token login failed: {error}");
                events.push(AppEvent::TokenLoginUnavailable);
            },
        }
        events
    }

    async fn password_login(&mut self, id: String, password: String) -> Vec<AppEvent> {
        if let Some(previous) = self.pending.take() {
            previous.abandon();
        }

        let label = self.config.client_label.clone();
        match self.connector.connect_with_password(&id, &password, &label).await {
            Ok(PasswordLogin::Authenticated(client)) => {
                let session = Arc::new(self.new_session(client));
                self.complete_login(session, Some(id), Some(password)).await;
                vec![AppEvent::LoggedIn]
            },
            Ok(PasswordLogin::PendingVerification { client, pin_code }) => {
                tracing::info!("Login for {id} needs PIN verification");
                let session = Arc::new(self.new_session(client));
                self.pending = Some(PendingLogin { session, id, password, worker: None });
                vec![AppEvent::VerificationRequired { pin_code }]
            },
            Err(error) => {
                tracing::info!("Password login for {id} failed: {error}");
                vec![AppEvent::LoginFailed { error }]
            },
        }
    }

    fn new_session(&self, client: K::Client) -> Session<K::Client> {
        Session::with_history(client, InputHistory::with_capacity(self.config.history_capacity))
    }

    /// Install `session` and persist the credentials that produced it.
    async fn complete_login(
        &mut self,
        session: Arc<Session<K::Client>>,
        id: Option<String>,
        password: Option<String>,
    ) {
        let credentials = Credentials { id, password, session_token: session.auth_token().await };
        if let Err(e) = self.store.save(&credentials) {
            tracing::warn!("Failed to persist credentials: {e}");
        }

        tracing::info!("Logged in");
        self.session = Some(session);
    }

    async fn session_failed(&mut self, error: SessionError) -> Vec<AppEvent> {
        tracing::info!("Session failed: {error}");
        self.teardown().await;
        vec![AppEvent::SessionFailed { error }]
    }

    async fn stop_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }

    async fn teardown(&mut self) {
        self.stop_poller().await;
        if let Some(pending) = self.pending.take() {
            pending.abandon();
        }
        if self.session.take().is_some() {
            tracing::info!("Session ended");
        }
    }
}

fn not_logged_in() -> SessionError {
    SessionError::generic("Not logged in")
}
