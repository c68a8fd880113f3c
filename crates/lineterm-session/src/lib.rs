//! Session layer for lineterm
//!
//! Everything the UI needs from the outside world, behind narrow seams:
//!
//! - [`SessionConnector`] / [`SessionClient`]: the external chat service. The
//!   protocol, authentication and transport live on the other side of these
//!   traits.
//! - [`Session`]: the authenticated client behind the single session lock,
//!   plus the bounded [`InputHistory`].
//! - [`CredentialStore`]: the flat credential file used to skip interactive
//!   login.
//! - [`SessionError`]: one failure type with a tagged [`FailureKind`] and a
//!   human-readable reason.

#![forbid(unsafe_code)]

pub mod client;
mod credentials;
mod error;
mod history;
mod session;
mod types;

pub use client::{PasswordLogin, SessionClient, SessionConnector};
pub use credentials::{CREDENTIALS_FILE, CredentialStore, Credentials};
pub use error::{CredentialError, FailureKind, SessionError};
pub use history::{HISTORY_CAPACITY, InputHistory};
pub use session::Session;
pub use types::{
    ContentType, ConversationTarget, ConversationTargets, Message, RECENT_MESSAGE_LIMIT,
    TargetKind,
};
