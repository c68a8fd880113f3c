//! Terminal UI for lineterm
//!
//! A thin shell over [`lineterm_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic
//! [`lineterm_app::Runtime`].
//!
//! This crate handles terminal rendering, file logging and the in-process
//! loopback chat service the binary talks to.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod logging;
pub mod loopback;
pub mod terminal;
pub mod ui;

pub use lineterm_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Runtime};
pub use logging::LOG_FILE;
pub use loopback::{LoopbackClient, LoopbackConnector};
pub use terminal::{TerminalDriver, TerminalError};
