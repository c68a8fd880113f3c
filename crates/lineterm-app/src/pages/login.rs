//! Login page.

use super::{PageId, PageIntent, Status, cycle};
use crate::{KeyInput, TextInput};

/// Where the login flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPhase {
    /// Nothing attempted yet.
    Idle,
    /// Resuming the session from the stored token.
    AttemptingTokenLogin,
    /// Waiting for the user to submit credentials.
    PromptCredentials,
    /// Password login in flight.
    AttemptingPasswordLogin,
    /// A PIN page is on top, waiting for out-of-band confirmation.
    AttemptingPinVerification,
}

/// Focusable widgets, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    /// User id field.
    UserId,
    /// Password field.
    Password,
    /// Login button.
    Login,
    /// Exit button.
    Exit,
}

const FOCUS_ORDER: [LoginFocus; 4] =
    [LoginFocus::UserId, LoginFocus::Password, LoginFocus::Login, LoginFocus::Exit];

/// Credential prompt with a status line.
#[derive(Debug, Clone)]
pub struct LoginPage {
    id: PageId,
    user_id: TextInput,
    password: TextInput,
    focus: LoginFocus,
    phase: LoginPhase,
    status: Option<Status>,
}

impl LoginPage {
    /// Fresh page in [`LoginPhase::Idle`].
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            user_id: TextInput::new(),
            password: TextInput::new(),
            focus: LoginFocus::UserId,
            phase: LoginPhase::Idle,
            status: None,
        }
    }

    /// Instance id.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// User id field.
    pub fn user_id(&self) -> &TextInput {
        &self.user_id
    }

    /// Password field.
    pub fn password(&self) -> &TextInput {
        &self.password
    }

    /// Focused widget.
    pub fn focus(&self) -> LoginFocus {
        self.focus
    }

    /// Current phase.
    pub fn phase(&self) -> LoginPhase {
        self.phase
    }

    /// Status line. `None` when blank.
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Replace the status line.
    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    /// Whether a login attempt is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            LoginPhase::AttemptingTokenLogin
                | LoginPhase::AttemptingPasswordLogin
                | LoginPhase::AttemptingPinVerification
        )
    }

    /// Fill empty fields from stored credentials. Typed input wins.
    pub fn prefill(&mut self, id: Option<&str>, password: Option<&str>) {
        if let Some(id) = id
            && self.user_id.is_empty()
        {
            self.user_id.set_text(id);
        }
        if let Some(password) = password
            && self.password.is_empty()
        {
            self.password.set_text(password);
        }
        if !self.user_id.is_empty() && self.focus == LoginFocus::UserId {
            self.focus = LoginFocus::Password;
        }
    }

    pub(crate) fn begin_token_login(&mut self) {
        self.phase = LoginPhase::AttemptingTokenLogin;
    }

    pub(crate) fn await_verification(&mut self) {
        self.phase = LoginPhase::AttemptingPinVerification;
    }

    /// Back to the prompt, optionally with a status message.
    pub(crate) fn prompt(&mut self, status: Option<Status>) {
        self.phase = LoginPhase::PromptCredentials;
        if status.is_some() {
            self.status = status;
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyInput) -> PageIntent {
        if key == KeyInput::Esc {
            return PageIntent::Back;
        }
        if self.is_busy() {
            return PageIntent::None;
        }

        match key {
            KeyInput::Tab | KeyInput::Down => self.move_focus(true),
            KeyInput::BackTab | KeyInput::Up => self.move_focus(false),
            KeyInput::Enter => match self.focus {
                LoginFocus::UserId => {
                    self.focus = LoginFocus::Password;
                    PageIntent::Redraw
                },
                LoginFocus::Password | LoginFocus::Login => self.submit(),
                LoginFocus::Exit => PageIntent::Quit,
            },
            other => {
                let field = match self.focus {
                    LoginFocus::UserId => &mut self.user_id,
                    LoginFocus::Password => &mut self.password,
                    LoginFocus::Login | LoginFocus::Exit => return PageIntent::None,
                };
                if field.handle_key(other) { PageIntent::Redraw } else { PageIntent::None }
            },
        }
    }

    fn move_focus(&mut self, forward: bool) -> PageIntent {
        let index = FOCUS_ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = FOCUS_ORDER[cycle(index, FOCUS_ORDER.len(), forward)];
        PageIntent::Redraw
    }

    fn submit(&mut self) -> PageIntent {
        let id = self.user_id.text().trim().to_string();
        if id.is_empty() {
            self.status = Some(Status::error("ID is required"));
            self.focus = LoginFocus::UserId;
            return PageIntent::Redraw;
        }

        self.phase = LoginPhase::AttemptingPasswordLogin;
        self.status = Some(Status::info("Login..."));
        PageIntent::SubmitLogin { id, password: self.password.text().to_string() }
    }
}
