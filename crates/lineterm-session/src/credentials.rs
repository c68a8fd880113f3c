//! Local credential persistence.
//!
//! A flat JSON object in the working directory:
//!
//! ```json
//! {"uid": "alice", "password": "hunter2", "authToken": "..."}
//! ```
//!
//! Every field is optional. Loading never fails: a missing or broken file,
//! or a field of the wrong type, just means "no stored value" for that field.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::Value;

use crate::CredentialError;

/// Well-known credential file name, relative to the working directory.
pub const CREDENTIALS_FILE: &str = ".lineterm";

/// Stored login details. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// User id.
    #[serde(rename = "uid", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Session token from the last successful login.
    #[serde(rename = "authToken", skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl Credentials {
    /// Whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.password.is_none() && self.session_token.is_none()
    }
}

/// Reads and writes the credential file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(CREDENTIALS_FILE)
    }
}

impl CredentialStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load whatever is stored. Absent, unreadable or malformed content
    /// yields absent fields.
    pub fn load(&self) -> Credentials {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!("No stored credentials at {}: {e}", self.path.display());
                return Credentials::default();
            },
        };

        let value = match serde_json::from_str::<Value>(&contents) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Ignoring malformed credential file: {e}");
                return Credentials::default();
            },
        };

        Credentials {
            id: string_field(&value, "uid"),
            password: string_field(&value, "password"),
            session_token: string_field(&value, "authToken"),
        }
    }

    /// Overwrite the file with `credentials`.
    pub fn save(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        let json = serde_json::to_string(credentials)?;
        fs::write(&self.path, json)?;
        tracing::debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }
}

/// Non-empty string field of a JSON object.
fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_owned)
}
