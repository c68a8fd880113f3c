//! lineterm entry point.

use lineterm_app::{Config, Runtime};
use lineterm_tui::{LOG_FILE, LoopbackConnector, TerminalDriver, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(LOG_FILE)?;
    tracing::info!("lineterm starting");

    let driver = TerminalDriver::new()?;
    let runtime = Runtime::new(driver, LoopbackConnector::new(), Config::default());
    runtime.run().await?;

    tracing::info!("lineterm stopped");
    Ok(())
}
