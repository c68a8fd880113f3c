//! End-to-end login scenarios.
//!
//! Each test runs the production [`Runtime`] with a [`SimDriver`] and a
//! [`ScriptedService`], types what a user would type, and checks the page
//! the user ends up on, the status line, the service calls and the
//! credential file.

use std::{fs, time::Duration};

use lineterm_app::{
    Config, KeyInput, Page, PageKind, Runtime, Status, StatusLevel, pages::LoginPhase,
};
use lineterm_harness::{
    Call, RenderedFrame, ScriptedConnector, ScriptedService, SimDriver, SimInput,
};
use lineterm_session::{CREDENTIALS_FILE, CredentialStore, SessionError};
use tempfile::TempDir;

type SimRuntime = Runtime<SimDriver, ScriptedConnector>;

fn config(dir: &TempDir) -> Config {
    Config { credentials_path: dir.path().join(CREDENTIALS_FILE), ..Config::default() }
}

fn runtime(service: &ScriptedService, dir: &TempDir) -> (SimRuntime, SimInput) {
    let driver = SimDriver::new();
    let input = driver.input();
    (Runtime::new(driver, service.connector(), config(dir)), input)
}

fn store(dir: &TempDir) -> CredentialStore {
    CredentialStore::new(dir.path().join(CREDENTIALS_FILE))
}

/// Process every injected input.
async fn settle(runtime: &mut SimRuntime) {
    while runtime.driver().has_pending() {
        assert!(!runtime.step().await.unwrap());
    }
}

/// Process one worker report, failing instead of hanging if none arrives.
async fn next_report(runtime: &mut SimRuntime) {
    let step = tokio::time::timeout(Duration::from_secs(5), runtime.step()).await;
    assert!(!step.expect("worker never reported").unwrap());
}

fn login_status(runtime: &SimRuntime) -> Option<Status> {
    match runtime.app().active_page() {
        Page::Login(login) => login.status().cloned(),
        other => panic!("expected login page, got {:?}", other.kind()),
    }
}

async fn submit(runtime: &mut SimRuntime, input: &SimInput, id: &str, password: &str) {
    input.text(id);
    input.key(KeyInput::Enter);
    input.text(password);
    input.key(KeyInput::Enter);
    settle(runtime).await;
}

#[tokio::test(start_paused = true)]
async fn stored_token_skips_the_prompt() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CREDENTIALS_FILE),
        r#"{"uid": "alice", "password": "pw", "authToken": "tok"}"#,
    )
    .unwrap();
    let service = ScriptedService::new().with_token("tok");
    let (mut runtime, _input) = runtime(&service, &dir);

    assert!(!runtime.start().await.unwrap());

    assert_eq!(runtime.app().active_page().kind(), PageKind::Main);
    assert_eq!(runtime.app().stack().depth(), 1);
    assert!(!runtime.driver().rendered_pages().contains(&PageKind::Login));
    assert_eq!(service.calls(), vec![Call::ConnectWithToken("tok".into())]);
    assert_eq!(store(&dir).load().session_token.as_deref(), Some("tok"));
}

#[tokio::test(start_paused = true)]
async fn rejected_token_falls_back_to_prefilled_prompt() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CREDENTIALS_FILE), r#"{"uid": "alice", "authToken": "stale"}"#)
        .unwrap();
    let service = ScriptedService::new();
    let (mut runtime, _input) = runtime(&service, &dir);

    runtime.start().await.unwrap();

    let Page::Login(login) = runtime.app().active_page() else {
        panic!("expected login page");
    };
    assert_eq!(login.phase(), LoginPhase::PromptCredentials);
    assert_eq!(login.user_id().text(), "alice");
    assert!(login.status().is_none());
}

#[tokio::test(start_paused = true)]
async fn password_login_without_verification_reaches_main() {
    let dir = TempDir::new().unwrap();
    let service = ScriptedService::new().with_account("alice", "pw");
    let (mut runtime, input) = runtime(&service, &dir);
    runtime.start().await.unwrap();

    submit(&mut runtime, &input, "alice", "pw").await;

    assert_eq!(runtime.app().active_page().kind(), PageKind::Main);
    assert!(service.calls().contains(&Call::ConnectWithPassword {
        id: "alice".into(),
        client_label: Config::default().client_label,
    }));
    let stored = store(&dir).load();
    assert_eq!(stored.id.as_deref(), Some("alice"));
    assert_eq!(stored.password.as_deref(), Some("pw"));
    assert_eq!(stored.session_token.as_deref(), Some("token-1"));
}

/// Index of the first frame matching `pred`.
fn first_frame(runtime: &SimRuntime, pred: impl Fn(&RenderedFrame) -> bool) -> usize {
    runtime.driver().frames().iter().position(pred).expect("frame never rendered")
}

fn shows_progress(frame: &RenderedFrame) -> bool {
    frame.page == PageKind::Login && frame.status.as_deref() == Some("Login...")
}

#[tokio::test(start_paused = true)]
async fn login_progress_is_drawn_before_success() {
    let dir = TempDir::new().unwrap();
    let service = ScriptedService::new().with_account("alice", "pw");
    let (mut runtime, input) = runtime(&service, &dir);
    runtime.start().await.unwrap();

    submit(&mut runtime, &input, "alice", "pw").await;

    let progress = first_frame(&runtime, shows_progress);
    let main = first_frame(&runtime, |frame| frame.page == PageKind::Main);
    assert!(progress < main);
}

#[tokio::test(start_paused = true)]
async fn login_progress_is_drawn_before_failure() {
    let dir = TempDir::new().unwrap();
    let service = ScriptedService::new().with_account("alice", "pw");
    let (mut runtime, input) = runtime(&service, &dir);
    runtime.start().await.unwrap();

    submit(&mut runtime, &input, "alice", "wrong").await;

    let progress = first_frame(&runtime, shows_progress);
    let failure = first_frame(&runtime, |frame| {
        frame.status.as_deref() == Some("Invalid ID or password")
    });
    assert!(progress < failure);
}

#[tokio::test(start_paused = true)]
async fn verification_success_persists_token() {
    let dir = TempDir::new().unwrap();
    let service = ScriptedService::new().with_verified_account("alice", "pw", "4821");
    let (mut runtime, input) = runtime(&service, &dir);
    runtime.start().await.unwrap();

    submit(&mut runtime, &input, "alice", "pw").await;

    let Page::PinEntry(pin) = runtime.app().active_page() else {
        panic!("expected PIN page");
    };
    assert_eq!(pin.prompt(), "Enter PinCode 4821 to your mobile phone in 2 minutes.");
    assert!(runtime.bridge().is_verifying());
    assert!(store(&dir).load().is_empty());

    service.confirm_verification();
    next_report(&mut runtime).await;

    assert_eq!(runtime.app().active_page().kind(), PageKind::Main);
    assert_eq!(runtime.app().stack().depth(), 1);
    assert_eq!(store(&dir).load().session_token.as_deref(), Some("token-1"));
}

#[tokio::test(start_paused = true)]
async fn cancelled_verification_has_no_effect() {
    let dir = TempDir::new().unwrap();
    let service = ScriptedService::new().with_verified_account("alice", "pw", "4821");
    let (mut runtime, input) = runtime(&service, &dir);
    runtime.start().await.unwrap();
    submit(&mut runtime, &input, "alice", "pw").await;

    input.key(KeyInput::Esc);
    settle(&mut runtime).await;

    assert_eq!(login_status(&runtime), Some(Status::warn("Login cancelled")));
    assert!(!runtime.bridge().is_verifying());

    // The abandoned continue_login now succeeds on the service side.
    service.confirm_verification();
    let late = tokio::time::timeout(Duration::from_secs(1), runtime.step()).await;

    assert!(late.is_err(), "cancelled verification must not report");
    assert!(service.calls().contains(&Call::ContinueLogin));
    assert_eq!(runtime.app().active_page().kind(), PageKind::Login);
    assert!(runtime.bridge().session().is_none());
    assert!(!dir.path().join(CREDENTIALS_FILE).exists());
}

#[tokio::test(start_paused = true)]
async fn rejected_verification_returns_to_prompt() {
    let dir = TempDir::new().unwrap();
    let service = ScriptedService::new().with_verified_account("alice", "pw", "4821");
    let (mut runtime, input) = runtime(&service, &dir);
    runtime.start().await.unwrap();
    submit(&mut runtime, &input, "alice", "pw").await;

    service.reject_verification(SessionError::protocol("PIN expired"));
    next_report(&mut runtime).await;

    assert_eq!(login_status(&runtime), Some(Status::error("PIN expired")));
    assert!(!dir.path().join(CREDENTIALS_FILE).exists());
}

#[tokio::test(start_paused = true)]
async fn wrong_password_shows_reason() {
    let dir = TempDir::new().unwrap();
    let service = ScriptedService::new().with_account("alice", "pw");
    let (mut runtime, input) = runtime(&service, &dir);
    runtime.start().await.unwrap();

    submit(&mut runtime, &input, "alice", "nope").await;

    let Page::Login(login) = runtime.app().active_page() else {
        panic!("expected login page");
    };
    assert_eq!(login.phase(), LoginPhase::PromptCredentials);
    assert_eq!(login.status().map(|s| s.level), Some(StatusLevel::Error));
    assert_eq!(login.status().map(|s| s.text.as_str()), Some("Invalid ID or password"));
}

#[tokio::test(start_paused = true)]
async fn logout_returns_to_prefilled_login() {
    let dir = TempDir::new().unwrap();
    let service = ScriptedService::new().with_account("alice", "pw");
    let (mut runtime, input) = runtime(&service, &dir);
    runtime.start().await.unwrap();
    submit(&mut runtime, &input, "alice", "pw").await;

    input.key(KeyInput::Down);
    input.key(KeyInput::Enter);
    settle(&mut runtime).await;

    let Page::Login(login) = runtime.app().active_page() else {
        panic!("expected login page");
    };
    assert_eq!(login.status().cloned(), Some(Status::warn("Logout")));
    assert_eq!(login.user_id().text(), "alice");
    assert!(runtime.bridge().session().is_none());
}

#[tokio::test(start_paused = true)]
async fn exit_quits_the_runtime() {
    let dir = TempDir::new().unwrap();
    let service = ScriptedService::new().with_account("alice", "pw");
    let (mut runtime, input) = runtime(&service, &dir);
    runtime.start().await.unwrap();
    submit(&mut runtime, &input, "alice", "pw").await;

    input.key(KeyInput::Up);
    input.key(KeyInput::Enter);

    assert!(!runtime.step().await.unwrap());
    assert!(runtime.step().await.unwrap());
}
