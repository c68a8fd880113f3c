//! File logging.
//!
//! The terminal belongs to the UI, so log records go to a file in the
//! working directory. The filter is fixed; the process reads no environment
//! variables.

use std::{fs::OpenOptions, io, path::Path, sync::Mutex};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name, relative to the working directory.
pub const LOG_FILE: &str = "lineterm.log";

/// Default filter directive.
const FILTER: &str = "info";

/// Install the global subscriber, appending to `path`.
pub fn init(path: impl AsRef<Path>) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let layer = fmt::layer().with_ansi(false).with_target(false).with_writer(Mutex::new(file));
    tracing_subscriber::registry().with(layer).with(EnvFilter::new(FILTER)).init();
    Ok(())
}
