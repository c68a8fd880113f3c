//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages page
//! navigation and per-page input completely decoupled from I/O and the
//! session client.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Owns the [`NavigationStack`] of pages; the top page receives input.
//! - Drives the login flow from token login to the main menu.
//! - Discards a chat page only after its poller has been confirmed stopped.
//! - Drops session results addressed to pages that are gone.

use lineterm_session::SessionError;

use crate::{
    AppAction, AppEvent, KeyInput, NavigationStack, Page, PageId, PageKind, PopOutcome, Status,
    pages::{ChatPage, LoginPage, LoginPhase, MenuPage, PageIntent, PinPage, TargetsPage},
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Page stack. The top page is the active view.
    stack: NavigationStack<Page>,
    /// Id handed to the next page created.
    next_page_id: u64,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// App showing an idle login page.
    pub fn new() -> Self {
        let root = Page::Login(LoginPage::new(PageId::new(1)));
        Self { stack: NavigationStack::with_root(root), next_page_id: 2, terminal_size: (80, 24) }
    }

    /// Begin the startup token login.
    pub fn start(&mut self) -> Vec<AppAction> {
        match self.login_mut() {
            Some(login) => {
                login.begin_token_login();
                vec![AppAction::TokenLogin, AppAction::Render]
            },
            None => vec![AppAction::Render],
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::CredentialsLoaded { id, password } => match self.login_mut() {
                Some(login) => {
                    login.prefill(id.as_deref(), password.as_deref());
                    vec![AppAction::Render]
                },
                None => vec![],
            },
            AppEvent::TokenLoginUnavailable => match self.login_mut() {
                Some(login) if login.phase() == LoginPhase::AttemptingTokenLogin => {
                    login.prompt(None);
                    vec![AppAction::Render]
                },
                _ => vec![],
            },
            AppEvent::LoggedIn => {
                if !self.login_mut().is_some_and(|login| login.is_busy()) {
                    tracing::debug!("Ignoring login result without a pending attempt");
                    return vec![];
                }
                let main = Page::Main(MenuPage::new(self.allocate_id()));
                self.stack.reset(main);
                vec![AppAction::Render]
            },
            AppEvent::LoginFailed { error } => match self.login_mut() {
                Some(login) => {
                    login.prompt(Some(failure_status(&error)));
                    vec![AppAction::Render]
                },
                None => vec![],
            },
            AppEvent::VerificationRequired { pin_code } => self.await_verification(pin_code),
            AppEvent::VerificationFailed { page, error } => {
                if !self.is_active(page, PageKind::PinEntry) {
                    return vec![];
                }
                self.stack.pop();
                if let Some(login) = self.login_mut() {
                    login.prompt(Some(failure_status(&error)));
                }
                vec![AppAction::Render]
            },
            AppEvent::TargetsLoaded { page, targets } => match self.stack.active_mut() {
                Page::Targets(listing) if listing.id() == page => {
                    listing.set_targets(targets);
                    vec![AppAction::Render]
                },
                _ => vec![],
            },
            AppEvent::MessagesRefreshed { page, messages } => match self.stack.active_mut() {
                Page::Chat(chat) if chat.id() == page && !chat.is_closing() => {
                    chat.apply_messages(messages);
                    vec![AppAction::Render]
                },
                _ => vec![],
            },
            AppEvent::ChatClosed { page } => {
                if !self.is_active(page, PageKind::Chat) {
                    return vec![];
                }
                self.stack.pop();
                vec![AppAction::Render]
            },
            AppEvent::SessionFailed { error } => {
                self.fresh_login(failure_status(&error));
                vec![AppAction::LoadCredentials, AppAction::Render]
            },
        }
    }

    /// Active page.
    pub fn active_page(&self) -> &Page {
        self.stack.active()
    }

    /// Page stack, root first.
    pub fn stack(&self) -> &NavigationStack<Page> {
        &self.stack
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        let intent = match self.stack.active_mut() {
            Page::Login(page) => page.handle_key(key),
            Page::PinEntry(page) => page.handle_key(key),
            Page::Main(page) => page.handle_key(key),
            Page::Targets(page) => page.handle_key(key),
            Page::Chat(page) => page.handle_key(key),
        };
        self.apply_intent(intent)
    }

    fn apply_intent(&mut self, intent: PageIntent) -> Vec<AppAction> {
        match intent {
            PageIntent::None => vec![],
            PageIntent::Redraw => vec![AppAction::Render],
            PageIntent::Back => match self.stack.pop() {
                PopOutcome::Restored { .. } => vec![AppAction::Render],
                PopOutcome::NoParent => vec![AppAction::Quit],
            },
            PageIntent::Quit => vec![AppAction::Quit],
            PageIntent::SubmitLogin { id, password } => {
                vec![AppAction::Render, AppAction::PasswordLogin { id, password }]
            },
            PageIntent::CancelVerification => {
                let page = self.stack.active().id();
                self.stack.pop();
                if let Some(login) = self.login_mut() {
                    login.prompt(Some(Status::warn("Login cancelled")));
                }
                vec![AppAction::CancelVerification { page }, AppAction::Render]
            },
            PageIntent::OpenTargets => {
                let page = self.allocate_id();
                self.stack.push(Page::Targets(TargetsPage::new(page)));
                vec![AppAction::Render, AppAction::FetchTargets { page }]
            },
            PageIntent::Logout => {
                self.fresh_login(Status::warn("Logout"));
                vec![AppAction::EndSession, AppAction::LoadCredentials, AppAction::Render]
            },
            PageIntent::OpenChat(target) => {
                let page = self.allocate_id();
                self.stack.push(Page::Chat(ChatPage::new(page, target.clone())));
                vec![AppAction::OpenChat { page, target }, AppAction::Render]
            },
            PageIntent::SendMessage { target, text } => {
                vec![AppAction::SendMessage { target, text }, AppAction::Render]
            },
            PageIntent::CloseChat => match self.stack.active_mut() {
                Page::Chat(chat) => {
                    chat.begin_close();
                    vec![AppAction::CloseChat { page: chat.id() }, AppAction::Render]
                },
                _ => vec![],
            },
        }
    }

    fn await_verification(&mut self, pin_code: String) -> Vec<AppAction> {
        let Some(login) = self.login_mut() else {
            return vec![];
        };
        if login.phase() != LoginPhase::AttemptingPasswordLogin {
            return vec![];
        }
        login.await_verification();

        let page = self.allocate_id();
        self.stack.push(Page::PinEntry(PinPage::new(page, pin_code)));
        vec![AppAction::StartVerification { page }, AppAction::Render]
    }

    /// Replace every page with a login prompt showing `status`.
    fn fresh_login(&mut self, status: Status) {
        let mut login = LoginPage::new(self.allocate_id());
        login.prompt(Some(status));
        self.stack.reset(Page::Login(login));
    }

    /// The login page, when it is active or directly below the PIN page.
    fn login_mut(&mut self) -> Option<&mut LoginPage> {
        let page = match self.stack.active().kind() {
            PageKind::Login => Some(self.stack.active_mut()),
            PageKind::PinEntry => self.stack.parent_mut(),
            PageKind::Main | PageKind::Targets | PageKind::Chat => None,
        };
        match page {
            Some(Page::Login(login)) => Some(login),
            _ => None,
        }
    }

    fn is_active(&self, page: PageId, kind: PageKind) -> bool {
        let active = self.stack.active();
        active.id() == page && active.kind() == kind
    }

    fn allocate_id(&mut self) -> PageId {
        let id = PageId::new(self.next_page_id);
        self.next_page_id += 1;
        id
    }
}

fn failure_status(error: &SessionError) -> Status {
    Status::error(error.reason.clone())
}

#[cfg(test)]
mod tests {
    use lineterm_session::{ConversationTarget, ConversationTargets, Message};

    use super::*;
    use crate::StatusLevel;

    fn login(app: &App) -> &LoginPage {
        match app.stack.iter().next() {
            Some(Page::Login(login)) => login,
            other => panic!("expected login root, got {other:?}"),
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let _ = app.handle(AppEvent::Key(KeyInput::Char(c)));
        }
    }

    fn prompting_app() -> App {
        let mut app = App::new();
        let _ = app.start();
        let _ = app.handle(AppEvent::TokenLoginUnavailable);
        app
    }

    fn submitted_app() -> App {
        let mut app = prompting_app();
        type_text(&mut app, "alice");
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));
        type_text(&mut app, "pw");
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));
        app
    }

    fn main_app() -> App {
        let mut app = submitted_app();
        let _ = app.handle(AppEvent::LoggedIn);
        app
    }

    fn chat_app() -> (App, PageId) {
        let mut app = main_app();
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));
        let listing = app.active_page().id();
        let _ = app.handle(AppEvent::TargetsLoaded {
            page: listing,
            targets: ConversationTargets {
                groups: vec![],
                contacts: vec![ConversationTarget::contact("c1", "bob")],
            },
        });
        let _ = app.handle(AppEvent::Key(KeyInput::Down));
        let actions = app.handle(AppEvent::Key(KeyInput::Enter));
        let page = app.active_page().id();
        assert!(matches!(actions.as_slice(), [AppAction::OpenChat { .. }, AppAction::Render]));
        (app, page)
    }

    #[test]
    fn start_attempts_token_login() {
        let mut app = App::new();
        let actions = app.start();

        assert_eq!(actions, vec![AppAction::TokenLogin, AppAction::Render]);
        assert_eq!(login(&app).phase(), LoginPhase::AttemptingTokenLogin);
    }

    #[test]
    fn token_login_unavailable_prompts_silently() {
        let app = prompting_app();
        assert_eq!(login(&app).phase(), LoginPhase::PromptCredentials);
        assert!(login(&app).status().is_none());
    }

    #[test]
    fn token_login_success_shows_main_as_root() {
        let mut app = App::new();
        let _ = app.start();
        let _ = app.handle(AppEvent::LoggedIn);

        assert_eq!(app.active_page().kind(), PageKind::Main);
        assert_eq!(app.stack().depth(), 1);
    }

    #[test]
    fn submit_emits_password_login() {
        let mut app = prompting_app();
        type_text(&mut app, "alice");
        let _ = app.handle(AppEvent::Key(KeyInput::Tab));
        type_text(&mut app, "pw");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(actions, vec![
            AppAction::Render,
            AppAction::PasswordLogin { id: "alice".into(), password: "pw".into() }
        ]);
        assert_eq!(login(&app).status().cloned(), Some(Status::info("Login...")));
    }

    #[test]
    fn listing_is_drawn_before_fetch() {
        let mut app = main_app();

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        let page = app.active_page().id();
        assert_eq!(actions, vec![AppAction::Render, AppAction::FetchTargets { page }]);
    }

    #[test]
    fn login_failure_shows_reason() {
        let mut app = submitted_app();
        let _ = app.handle(AppEvent::LoginFailed { error: SessionError::protocol("bad password") });

        let status = login(&app).status().cloned();
        assert_eq!(status, Some(Status::error("bad password")));
        assert_eq!(login(&app).phase(), LoginPhase::PromptCredentials);
    }

    #[test]
    fn verification_pushes_pin_page() {
        let mut app = submitted_app();
        let actions = app.handle(AppEvent::VerificationRequired { pin_code: "1234".into() });

        let page = app.active_page().id();
        assert_eq!(actions, vec![AppAction::StartVerification { page }, AppAction::Render]);
        assert!(matches!(app.active_page(), Page::PinEntry(pin) if pin.pin_code() == "1234"));
        assert_eq!(login(&app).phase(), LoginPhase::AttemptingPinVerification);
    }

    #[test]
    fn cancel_returns_to_login_with_notice() {
        let mut app = submitted_app();
        let _ = app.handle(AppEvent::VerificationRequired { pin_code: "1234".into() });
        let page = app.active_page().id();

        let actions = app.handle(AppEvent::Key(KeyInput::Esc));

        assert_eq!(actions, vec![AppAction::CancelVerification { page }, AppAction::Render]);
        assert_eq!(app.active_page().kind(), PageKind::Login);
        assert_eq!(login(&app).status().map(|s| s.level), Some(StatusLevel::Warn));

        // A late result for the abandoned attempt changes nothing.
        let late = app.handle(AppEvent::VerificationFailed {
            page,
            error: SessionError::generic("timeout"),
        });
        assert!(late.is_empty());
        assert_eq!(login(&app).status().map(|s| s.text.as_str()), Some("Login cancelled"));
    }

    #[test]
    fn verification_failure_pops_pin_page() {
        let mut app = submitted_app();
        let _ = app.handle(AppEvent::VerificationRequired { pin_code: "1234".into() });
        let page = app.active_page().id();

        let _ = app.handle(AppEvent::VerificationFailed {
            page,
            error: SessionError::protocol("PIN expired"),
        });

        assert_eq!(app.active_page().kind(), PageKind::Login);
        assert_eq!(login(&app).status().cloned(), Some(Status::error("PIN expired")));
    }

    #[test]
    fn logged_in_without_attempt_is_ignored() {
        let mut app = main_app();
        let before = app.active_page().id();

        assert!(app.handle(AppEvent::LoggedIn).is_empty());
        assert_eq!(app.active_page().id(), before);
    }

    #[test]
    fn chat_is_popped_only_after_close_confirmed() {
        let (mut app, page) = chat_app();

        let actions = app.handle(AppEvent::Key(KeyInput::Esc));
        assert_eq!(actions, vec![AppAction::CloseChat { page }, AppAction::Render]);
        assert_eq!(app.active_page().kind(), PageKind::Chat);

        let late = app.handle(AppEvent::MessagesRefreshed {
            page,
            messages: vec![Message::from_sender("bob", "late")],
        });
        assert!(late.is_empty());

        let _ = app.handle(AppEvent::ChatClosed { page });
        assert_eq!(app.active_page().kind(), PageKind::Targets);
    }

    #[test]
    fn refresh_rebuilds_transcript() {
        let (mut app, page) = chat_app();

        let actions = app.handle(AppEvent::MessagesRefreshed {
            page,
            messages: vec![Message::own("second"), Message::from_sender("bob", "first")],
        });

        assert_eq!(actions, vec![AppAction::Render]);
        let Page::Chat(chat) = app.active_page() else { panic!("expected chat page") };
        assert_eq!(chat.lines().len(), 2);
        assert!(chat.lines()[1].is_own());
    }

    #[test]
    fn logout_replaces_stack_with_login() {
        let mut app = main_app();
        let _ = app.handle(AppEvent::Key(KeyInput::Down));

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert_eq!(actions, vec![
            AppAction::EndSession,
            AppAction::LoadCredentials,
            AppAction::Render
        ]);
        assert_eq!(app.stack().depth(), 1);
        assert_eq!(login(&app).status().cloned(), Some(Status::warn("Logout")));
    }

    #[test]
    fn session_failure_forces_fresh_login() {
        let (mut app, _) = chat_app();

        let actions = app.handle(AppEvent::SessionFailed {
            error: SessionError::generic("connection reset"),
        });

        assert_eq!(actions, vec![AppAction::LoadCredentials, AppAction::Render]);
        assert_eq!(app.stack().depth(), 1);
        assert_eq!(login(&app).phase(), LoginPhase::PromptCredentials);
        assert_eq!(login(&app).status().cloned(), Some(Status::error("connection reset")));
    }

    #[test]
    fn back_on_root_quits() {
        let mut app = main_app();
        assert_eq!(app.handle(AppEvent::Key(KeyInput::Esc)), vec![AppAction::Quit]);
    }

    #[test]
    fn stale_targets_are_ignored() {
        let mut app = main_app();
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));
        let listing = app.active_page().id();
        let _ = app.handle(AppEvent::Key(KeyInput::Esc));

        let actions = app.handle(AppEvent::TargetsLoaded {
            page: listing,
            targets: ConversationTargets::default(),
        });

        assert!(actions.is_empty());
        assert_eq!(app.active_page().kind(), PageKind::Main);
    }
}
