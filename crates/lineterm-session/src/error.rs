//! Session and persistence errors.
//!
//! The external service fails in two shapes: a structured protocol failure
//! that carries a reason meant for the user, and everything else. Both are
//! folded into [`SessionError`] so callers only ever read one `reason`.

use std::io;

use thiserror::Error;

/// Reason shown when a generic failure carries no message of its own.
const FALLBACK_REASON: &str = "Unexpected error";

/// Which failure shape the external service produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Structured failure reported by the protocol. The reason is shown
    /// verbatim.
    Protocol,
    /// Any other fault (transport, decoding, client bug). The reason is a
    /// best-effort description.
    Generic,
}

/// Failure of a call into the external session client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct SessionError {
    /// Failure shape.
    pub kind: FailureKind,
    /// Human-readable reason.
    pub reason: String,
}

impl SessionError {
    /// Structured protocol failure.
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self { kind: FailureKind::Protocol, reason: reason.into() }
    }

    /// Unstructured failure. Empty messages are replaced with a fallback.
    pub fn generic(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() { FALLBACK_REASON.to_string() } else { reason };
        Self { kind: FailureKind::Generic, reason }
    }

    /// Whether this is a structured protocol failure.
    pub fn is_protocol(&self) -> bool {
        self.kind == FailureKind::Protocol
    }
}

/// Failure to write the credential file.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The file could not be written.
    #[error("failed to write credentials: {0}")]
    Io(#[from] io::Error),

    /// The record could not be encoded.
    #[error("failed to encode credentials: {0}")]
    Encode(#[from] serde_json::Error),
}
