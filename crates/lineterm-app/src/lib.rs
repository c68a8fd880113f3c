//! Application layer for lineterm
//!
//! Pure page state machine plus the generic runtime that connects it to a
//! terminal (or a simulation) and to the external session client.
//!
//! # Components
//!
//! - [`App`]: page navigation and per-page input handling. No I/O.
//! - [`NavigationStack`]: ordered stack of pages; the top is the active view.
//! - [`Bridge`]: executes [`AppAction`]s against the session and owns the
//!   background workers.
//! - [`Driver`]: trait for platform-specific I/O (terminal, simulation).
//! - [`Runtime`]: event loop tying the three together.

#![forbid(unsafe_code)]

mod action;
mod app;
mod bridge;
mod config;
mod driver;
mod event;
mod input;
mod navigation;
pub mod pages;
mod runtime;
mod text_input;
pub mod worker;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use config::{Config, FALLBACK_CLIENT_LABEL};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::KeyInput;
pub use navigation::{NavigationStack, PopOutcome};
pub use pages::{Page, PageId, PageKind, Status, StatusLevel};
pub use runtime::Runtime;
pub use text_input::TextInput;
pub use worker::WorkerEvent;
