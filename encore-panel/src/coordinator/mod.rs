//! Job status coordinator
//!
//! Keeps the panel's view of job statuses and drives it from three sources:
//! manual triggers, push completion events and a fixed poll interval. The
//! state lives on a single task; callers talk to it through a
//! `CoordinatorHandle` and watch a snapshot of the ordered job list.

mod actor;
mod board;

use encore_core::domain::job::MetricJob;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::push::PushChannel;
use crate::service::{JobTrigger, ViewInvalidator};
use actor::Actor;
use board::JobBoard;

const COMMAND_BUFFER: usize = 32;
const PUSH_BUFFER: usize = 64;

/// Coordinator timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorSettings {
    /// Time a job stays in `success` before returning to `idle`
    pub revert_delay: Duration,
    /// Interval between unconditional view refreshes
    pub poll_interval: Duration,
    /// How long after a response-settled run its push echo is still expected
    pub echo_window: Duration,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            revert_delay: Duration::from_secs(3),
            poll_interval: Duration::from_secs(10),
            echo_window: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("coordinator has shut down")]
    Closed,
}

pub(crate) enum Command {
    Trigger(String),
}

pub struct JobCoordinator;

impl JobCoordinator {
    /// Starts a coordinator session
    ///
    /// Spawns the coordinator task and the push channel's pump. Both stop
    /// when the returned handle is shut down or dropped.
    pub fn spawn(
        jobs: Vec<MetricJob>,
        trigger: Arc<dyn JobTrigger>,
        views: Arc<dyn ViewInvalidator>,
        push: Box<dyn PushChannel>,
        settings: CoordinatorSettings,
    ) -> CoordinatorHandle {
        let board = JobBoard::new(jobs);
        let (snapshot_tx, snapshot_rx) = watch::channel(board.jobs());
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (push_tx, push_rx) = mpsc::channel(PUSH_BUFFER);
        let shutdown = CancellationToken::new();

        let push_task = tokio::spawn(push.pump(push_tx, shutdown.child_token()));

        let actor = Actor::new(board, trigger, views, settings, snapshot_tx);
        let task = tokio::spawn(actor.run(command_rx, push_rx, push_task, shutdown.clone()));

        CoordinatorHandle {
            commands: command_tx,
            jobs: snapshot_rx,
            shutdown,
            task: Some(task),
        }
    }
}

/// Handle to a running coordinator
///
/// Dropping the handle stops the coordinator; `shutdown` additionally waits
/// until it has released everything.
pub struct CoordinatorHandle {
    commands: mpsc::Sender<Command>,
    jobs: watch::Receiver<Vec<MetricJob>>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl CoordinatorHandle {
    /// Requests a manual run of `job_id`
    ///
    /// Unknown ids and jobs that are already running are ignored by the
    /// coordinator.
    pub async fn trigger(&self, job_id: &str) -> Result<(), CoordinatorError> {
        self.commands
            .send(Command::Trigger(job_id.to_string()))
            .await
            .map_err(|_| CoordinatorError::Closed)
    }

    /// Current jobs in display order
    pub fn jobs(&self) -> Vec<MetricJob> {
        self.jobs.borrow().clone()
    }

    pub fn job(&self, job_id: &str) -> Option<MetricJob> {
        self.jobs.borrow().iter().find(|job| job.id == job_id).cloned()
    }

    /// Watches the job list; changes after every transition
    pub fn subscribe(&self) -> watch::Receiver<Vec<MetricJob>> {
        self.jobs.clone()
    }

    /// Stops the coordinator and waits for it to release its timers, push
    /// subscription and in-flight calls
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Coordinator task failed: {}", e);
            }
        }
    }
}

impl Drop for CoordinatorHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
