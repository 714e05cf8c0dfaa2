//! Coordinator task
//!
//! The only writer of job state. Trigger commands, finished trigger calls,
//! push signals, revert and echo timers and the poll timer are all handled
//! on this one task, so transitions never interleave.

use chrono::Utc;
use encore_core::domain::job::MetricJob;
use encore_core::domain::view::ViewKey;
use encore_core::dto::event::JobEvent;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinHandle, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::time::{DelayQueue, delay_queue};
use tracing::{debug, error, info, warn};

use super::board::{Dispatch, JobBoard, Outcome};
use super::{Command, CoordinatorSettings};

/// Per-job deadlines kept in the actor's `DelayQueue`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Timer {
    /// `success → idle`
    Revert(String),
    /// Stop expecting the push echo of a response-settled run
    EchoExpiry(String),
}
use crate::push::PushSignal;
use crate::service::{JobTrigger, ViewInvalidator};

pub(super) struct Actor {
    board: JobBoard,
    trigger: Arc<dyn JobTrigger>,
    views: Arc<dyn ViewInvalidator>,
    settings: CoordinatorSettings,
    snapshot: watch::Sender<Vec<MetricJob>>,
    inflight: JoinSet<anyhow::Result<()>>,
    inflight_jobs: HashMap<task::Id, (String, u64)>,
    timers: DelayQueue<Timer>,
    timer_keys: HashMap<Timer, delay_queue::Key>,
}

impl Actor {
    pub(super) fn new(
        board: JobBoard,
        trigger: Arc<dyn JobTrigger>,
        views: Arc<dyn ViewInvalidator>,
        settings: CoordinatorSettings,
        snapshot: watch::Sender<Vec<MetricJob>>,
    ) -> Self {
        Self {
            board,
            trigger,
            views,
            settings,
            snapshot,
            inflight: JoinSet::new(),
            inflight_jobs: HashMap::new(),
            timers: DelayQueue::new(),
            timer_keys: HashMap::new(),
        }
    }

    /// Runs until `shutdown` is cancelled
    ///
    /// On exit, in-flight trigger calls, pending timers, the poll timer and
    /// the push task are all released before this future completes.
    pub(super) async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut push: mpsc::Receiver<PushSignal>,
        push_task: JoinHandle<()>,
        shutdown: CancellationToken,
    ) {
        let period = self.settings.poll_interval;
        let mut poll = time::interval_at(Instant::now() + period, period);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Coordinator started (poll interval: {:?}, revert delay: {:?})",
            period, self.settings.revert_delay
        );

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                Some(command) = commands.recv() => self.handle_command(command),

                Some(joined) = self.inflight.join_next_with_id(), if !self.inflight.is_empty() => {
                    match joined {
                        Ok((id, result)) => self.handle_response(id, result),
                        Err(e) => {
                            let id = e.id();
                            self.handle_response(id, Err(anyhow::anyhow!("trigger task failed: {}", e)));
                        }
                    }
                }

                Some(signal) = push.recv() => self.handle_push(signal),

                Some(expired) = self.timers.next(), if !self.timers.is_empty() => {
                    let timer = expired.into_inner();
                    self.timer_keys.remove(&timer);
                    self.handle_timer(timer);
                }

                _ = poll.tick() => {
                    debug!("Poll interval elapsed");
                    self.invalidate_views();
                }
            }
        }

        push_task.abort();
        let _ = push_task.await;
        self.inflight.shutdown().await;
        self.timers.clear();

        info!("Coordinator stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Trigger(job_id) => {
                let Some(dispatch) = self.board.begin(&job_id) else {
                    match self.board.get(&job_id) {
                        Some(_) => debug!(job = %job_id, "Job already running, ignoring trigger"),
                        None => debug!(job = %job_id, "Unknown job, ignoring trigger"),
                    }
                    return;
                };

                self.cancel_timer(&Timer::Revert(dispatch.job_id.clone()));
                self.cancel_timer(&Timer::EchoExpiry(dispatch.job_id.clone()));
                self.dispatch(dispatch);
                self.publish();
            }
        }
    }

    fn dispatch(&mut self, dispatch: Dispatch) {
        let Dispatch {
            job_id,
            endpoint,
            cycle,
        } = dispatch;

        info!(job = %job_id, cycle, "Triggering job at {}", endpoint);

        let trigger = Arc::clone(&self.trigger);
        let handle = self
            .inflight
            .spawn(async move { trigger.trigger(&endpoint).await });
        self.inflight_jobs.insert(handle.id(), (job_id, cycle));
    }

    fn handle_response(&mut self, id: task::Id, result: anyhow::Result<()>) {
        let Some((job_id, cycle)) = self.inflight_jobs.remove(&id) else {
            return;
        };

        if let Err(e) = &result {
            error!(job = %job_id, cycle, "Error triggering job: {:#}", e);
        }

        match self.board.finish(&job_id, cycle, result.is_ok(), Utc::now()) {
            Outcome::Succeeded => {
                info!(job = %job_id, cycle, "Job succeeded");
                self.schedule(Timer::EchoExpiry(job_id.clone()), self.settings.echo_window);
                self.settle_success(&job_id);
            }
            Outcome::Failed => {
                self.publish();
            }
            Outcome::Unchanged => {
                debug!(job = %job_id, cycle, "Trigger response already superseded");
            }
        }
    }

    fn handle_push(&mut self, signal: PushSignal) {
        match signal {
            PushSignal::Opened => info!("Push channel opened"),
            PushSignal::Failed(reason) => error!("Push channel error: {}", reason),
            PushSignal::Message(data) => {
                let event = match JobEvent::parse(&data) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("Error parsing push message: {} (payload: {:?})", e, data);
                        return;
                    }
                };

                if !event.is_completed() {
                    debug!(job = %event.job_type, status = %event.status, "Ignoring push event");
                    return;
                }

                info!(job = %event.job_type, "Job completed");
                if self.board.complete(&event.job_type, Utc::now()) == Outcome::Succeeded {
                    self.settle_success(&event.job_type);
                }
                // either consumed as the echo or started a fresh run
                self.cancel_timer(&Timer::EchoExpiry(event.job_type));
            }
        }
    }

    fn handle_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Revert(job_id) => {
                if self.board.revert(&job_id) {
                    debug!(job = %job_id, "Job back to idle");
                    self.publish();
                }
            }
            Timer::EchoExpiry(job_id) => {
                if self.board.expire_echo(&job_id) {
                    debug!(job = %job_id, "No completion event for settled run");
                }
            }
        }
    }

    /// Follow-up for every entry into `success`
    fn settle_success(&mut self, job_id: &str) {
        self.schedule(Timer::Revert(job_id.to_string()), self.settings.revert_delay);
        self.invalidate_views();
        self.publish();
    }

    /// Arms `timer`, replacing a pending one for the same job
    fn schedule(&mut self, timer: Timer, delay: std::time::Duration) {
        self.cancel_timer(&timer);
        let key = self.timers.insert(timer.clone(), delay);
        self.timer_keys.insert(timer, key);
    }

    fn cancel_timer(&mut self, timer: &Timer) {
        if let Some(key) = self.timer_keys.remove(timer) {
            self.timers.remove(&key);
        }
    }

    fn invalidate_views(&self) {
        for key in ViewKey::ALL {
            self.views.mark_stale(&key);
        }
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.board.jobs());
    }
}
