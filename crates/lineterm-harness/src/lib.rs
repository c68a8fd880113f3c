//! Deterministic simulation harness for lineterm.
//!
//! Runs the production [`lineterm_app::Runtime`] against in-memory doubles:
//!
//! - [`SimDriver`]: injected key presses instead of a terminal, recorded
//!   renders instead of drawing.
//! - [`ScriptedService`]: a scripted chat service whose connector and
//!   clients record every call and can be told to fail or to hold a PIN
//!   verification until the test releases it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod scripted;
pub mod sim_driver;

pub use scripted::{Call, ScriptedClient, ScriptedConnector, ScriptedService};
pub use sim_driver::{RenderedFrame, SimDriver, SimDriverError, SimInput};
