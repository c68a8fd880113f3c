//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`lineterm_app::Runtime`] orchestration code runs in both production and
//! simulation.

use lineterm_app::{App, AppEvent, Driver, KeyInput, Page, PageKind};
use tokio::sync::mpsc;

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// What the user would have seen at one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Active page kind.
    pub page: PageKind,
    /// Login status line text, when the login page is active.
    pub status: Option<String>,
    /// Whether a listing page was still waiting for its fetch.
    pub loading: bool,
}

impl RenderedFrame {
    fn capture(app: &App) -> Self {
        let page = app.active_page();
        let status = match page {
            Page::Login(login) => login.status().map(|status| status.text.clone()),
            _ => None,
        };
        let loading = matches!(page, Page::Targets(listing) if !listing.is_loaded());
        Self { page: page.kind(), status, loading }
    }
}

/// Handle for injecting input into a [`SimDriver`] owned by a runtime.
#[derive(Debug, Clone)]
pub struct SimInput {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl SimInput {
    /// Inject an `AppEvent` for processing.
    pub fn event(&self, event: AppEvent) {
        // The driver holds its own sender, so the channel is never closed
        // while a SimInput exists.
        let _ = self.tx.send(event);
    }

    /// Inject a key press.
    pub fn key(&self, key: KeyInput) {
        self.event(AppEvent::Key(key));
    }

    /// Inject one key press per character.
    pub fn text(&self, text: &str) {
        for c in text.chars() {
            self.key(KeyInput::Char(c));
        }
    }
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] so the same [`lineterm_app::Runtime`] orchestration
/// code runs in both production TUI and simulation tests.
pub struct SimDriver {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    input: SimInput,
    frames: Vec<RenderedFrame>,
    stopped: bool,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            input: SimInput { tx },
            frames: Vec::new(),
            stopped: false,
        }
    }

    /// Handle for injecting input after the driver moves into a runtime.
    pub fn input(&self) -> SimInput {
        self.input.clone()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.frames.len()
    }

    /// Active page kind at every render, oldest first.
    pub fn rendered_pages(&self) -> Vec<PageKind> {
        self.frames.iter().map(|frame| frame.page).collect()
    }

    /// Every render, oldest first.
    pub fn frames(&self) -> &[RenderedFrame] {
        &self.frames
    }

    /// Whether input is waiting to be processed.
    pub fn has_pending(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Whether [`Driver::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        Ok(self.rx.recv().await)
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.frames.push(RenderedFrame::capture(app));
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
