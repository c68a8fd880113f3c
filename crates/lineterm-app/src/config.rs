//! Runtime configuration.

use std::{ffi::OsString, path::PathBuf, time::Duration};

use lineterm_session::{CREDENTIALS_FILE, HISTORY_CAPACITY};

/// Client label used when the host name is unavailable.
pub const FALLBACK_CLIENT_LABEL: &str = "lineterm";

/// Settings for the [`crate::Bridge`] and its workers.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential file location.
    pub credentials_path: PathBuf,
    /// Delay between two message fetches of an open conversation.
    pub poll_interval: Duration,
    /// Number of sent inputs kept in the session history.
    pub history_capacity: usize,
    /// Device name reported to the service on password login. Defaults to
    /// the host name.
    pub client_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(CREDENTIALS_FILE),
            poll_interval: Duration::from_secs(1),
            history_capacity: HISTORY_CAPACITY,
            client_label: client_label(hostname::get().ok()),
        }
    }
}

/// Label for a host name lookup result. Missing, empty or non-UTF-8 names
/// fall back to [`FALLBACK_CLIENT_LABEL`].
fn client_label(host: Option<OsString>) -> String {
    host.and_then(|name| name.into_string().ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_CLIENT_LABEL.to_string())
}
