//! Event loop.
//!
//! Feeds driver input and worker reports into the [`App`], then carries out
//! the resulting actions:
//! - [`App`]: page state machine
//! - [`Bridge`]: session client and background workers
//! - [`Driver`]: terminal or simulated I/O

use lineterm_session::SessionConnector;
use tokio::sync::mpsc;

use crate::{App, AppAction, AppEvent, Bridge, Config, Driver, WorkerEvent};

/// Where the next input came from.
enum Input<E> {
    Driver(Result<Option<AppEvent>, E>),
    Worker(Option<WorkerEvent>),
}

/// Event loop over one driver and one session connector.
///
/// # Type Parameters
///
/// - `D`: terminal or simulated I/O
/// - `K`: Connector to the external chat service
pub struct Runtime<D, K>
where
    D: Driver,
    K: SessionConnector,
{
    driver: D,
    app: App,
    bridge: Bridge<K>,
    worker_events: mpsc::UnboundedReceiver<WorkerEvent>,
}

impl<D, K> Runtime<D, K>
where
    D: Driver,
    K: SessionConnector,
{
    /// Runtime starting on the login page.
    pub fn new(driver: D, connector: K, config: Config) -> Self {
        let (events_tx, worker_events) = mpsc::unbounded_channel();
        let bridge = Bridge::new(connector, config, events_tx);
        Self { driver, app: App::new(), bridge, worker_events }
    }

    /// Run the main event loop until the App quits or input ends.
    ///
    /// Workers are stopped and the driver released on every exit path.
    ///
    /// # Errors
    ///
    /// Fails when the driver fails to read input or draw.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let result = self.run_loop().await;
        self.bridge.shutdown().await;
        self.driver.stop();
        result
    }

    async fn run_loop(&mut self) -> Result<(), D::Error> {
        if self.start().await? {
            return Ok(());
        }
        while !self.step().await? {}
        Ok(())
    }

    /// Render the first frame and begin the startup token login.
    ///
    /// Returns `true` if the application should quit.
    pub async fn start(&mut self) -> Result<bool, D::Error> {
        let actions = self.app.start();
        self.process_actions(actions).await
    }

    /// Wait for one driver or worker input and process it to completion.
    ///
    /// Returns `true` if the application should quit.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let input = tokio::select! {
            event = self.driver.poll_event() => Input::Driver(event),
            event = self.worker_events.recv() => Input::Worker(event),
        };

        match input {
            Input::Driver(event) => match event? {
                Some(event) => {
                    let actions = self.app.handle(event);
                    self.process_actions(actions).await
                },
                None => {
                    tracing::debug!("Input source closed");
                    Ok(true)
                },
            },
            Input::Worker(Some(event)) => {
                let events = self.bridge.handle_worker_event(event).await;
                self.process_bridge_events(events).await
            },
            Input::Worker(None) => Ok(false),
        }
    }

    /// Run `initial_actions` and every action they cause.
    ///
    /// Returns `true` once a [`AppAction::Quit`] is reached.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),

                    // Session operations go through the bridge
                    AppAction::TokenLogin
                    | AppAction::LoadCredentials
                    | AppAction::PasswordLogin { .. }
                    | AppAction::StartVerification { .. }
                    | AppAction::CancelVerification { .. }
                    | AppAction::FetchTargets { .. }
                    | AppAction::OpenChat { .. }
                    | AppAction::CloseChat { .. }
                    | AppAction::SendMessage { .. }
                    | AppAction::EndSession => {
                        let events = self.bridge.process_app_action(action).await;
                        for event in events {
                            let new_actions = self.app.handle(event);
                            pending_actions.extend(new_actions);
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Feed Bridge results back into the App.
    async fn process_bridge_events(&mut self, events: Vec<AppEvent>) -> Result<bool, D::Error> {
        for event in events {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Page state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Session side.
    pub fn bridge(&self) -> &Bridge<K> {
        &self.bridge
    }

    /// Driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Driver, mutably.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
