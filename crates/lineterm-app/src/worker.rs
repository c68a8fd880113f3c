//! Background workers.
//!
//! Two kinds of task run next to the foreground loop, never both at once:
//!
//! - **Verification**: waits in `continue_login` while the PIN page is shown.
//! - **Polling**: refetches the recent messages of an open conversation on a
//!   fixed cadence.
//!
//! Workers never touch UI state. They report [`WorkerEvent`]s over a channel
//! and the [`crate::Bridge`] decides whether the report is still wanted.
//! Cancellation is cooperative: a remote call in flight always runs to
//! completion, the result is just not reported.

use std::{sync::Arc, time::Duration};

use lineterm_session::{
    ConversationTarget, Message, RECENT_MESSAGE_LIMIT, Session, SessionClient, SessionError,
};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::PageId;

/// Report from a background worker.
#[derive(Debug)]
pub enum WorkerEvent {
    /// A poll completed.
    MessagesFetched {
        /// Chat page the poller belongs to.
        page: PageId,
        /// Recent messages, newest first.
        messages: Vec<Message>,
    },

    /// A poll failed. The poller has exited.
    PollingFailed {
        /// Chat page the poller belonged to.
        page: PageId,
        /// Failure reported by the service.
        error: SessionError,
    },

    /// `continue_login` returned.
    VerificationFinished {
        /// PIN page the attempt belongs to.
        page: PageId,
        /// Outcome of the verification.
        result: Result<(), SessionError>,
    },
}

/// Handle to a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    page: PageId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Page the worker serves.
    pub fn page(&self) -> PageId {
        self.page
    }

    /// Whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the worker and wait for it to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!("Worker for {} ended abnormally: {e}", self.page);
        }
    }

    /// Cancel the worker without waiting for it.
    pub fn detach(self) {
        self.cancel.cancel();
        tracing::debug!("Detached worker for {}", self.page);
    }
}

/// Start polling `target` for the chat page `page`.
///
/// Each iteration fetches up to [`RECENT_MESSAGE_LIMIT`] messages under the
/// session lock, reports them, then sleeps for `interval`. The first fetch
/// happens immediately. A failed fetch is reported once and ends the task.
pub fn spawn_polling<C: SessionClient>(
    session: Arc<Session<C>>,
    page: PageId,
    target: ConversationTarget,
    interval: Duration,
    events: mpsc::UnboundedSender<WorkerEvent>,
) -> WorkerHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        tracing::debug!("Polling {} for {page}", target.name);
        loop {
            if token.is_cancelled() {
                break;
            }

            let result = session.recent_messages(&target, RECENT_MESSAGE_LIMIT).await;
            if token.is_cancelled() {
                break;
            }

            match result {
                Ok(messages) => {
                    if events.send(WorkerEvent::MessagesFetched { page, messages }).is_err() {
                        break;
                    }
                },
                Err(error) => {
                    tracing::info!("Polling for {page} failed: {error}");
                    let _ = events.send(WorkerEvent::PollingFailed { page, error });
                    break;
                },
            }

            tokio::select! {
                () = token.cancelled() => break,
                () = tokio::time::sleep(interval) => {},
            }
        }
        tracing::debug!("Poller for {page} stopped");
    });

    WorkerHandle { page, cancel, task }
}

/// Wait for out-of-band verification of a pending login.
///
/// The result is reported only if the attempt has not been cancelled by the
/// time `continue_login` returns.
pub fn spawn_verification<C: SessionClient>(
    session: Arc<Session<C>>,
    page: PageId,
    events: mpsc::UnboundedSender<WorkerEvent>,
) -> WorkerHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        let result = session.continue_login().await;
        if token.is_cancelled() {
            tracing::debug!("Dropping verification result for cancelled {page}");
            return;
        }
        let _ = events.send(WorkerEvent::VerificationFinished { page, result });
    });

    WorkerHandle { page, cancel, task }
}
