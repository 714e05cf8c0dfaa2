//! Job board
//!
//! The per-job state machine, kept free of I/O and timers so every
//! transition can be checked synchronously. The actor feeds it events and
//! acts on the returned `Outcome`.
//!
//! ```text
//! idle ──trigger──▶ running ──ok / completed──▶ success ──revert──▶ idle
//!                      │
//!                      └──failed──▶ error ──trigger──▶ running
//! ```
//!
//! Each trigger opens a numbered cycle. Trigger responses carry their cycle
//! and are dropped unless the job is still running in it. A response that
//! settles a cycle first leaves an expected echo, which absorbs the push
//! completion the server sends for the same run. The actor expires the echo
//! after a fixed window so a later completion is not swallowed.

use chrono::{DateTime, Utc};
use encore_core::domain::job::{JobStatus, LastRun, MetricJob};
use std::collections::HashMap;

/// Outbound call to make after a successful `begin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub job_id: String,
    pub endpoint: String,
    pub cycle: u64,
}

/// Result of feeding an event to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Job entered `success`: schedule the revert and invalidate views
    Succeeded,
    /// Job entered `error`
    Failed,
    /// Nothing changed
    Unchanged,
}

#[derive(Debug)]
struct Slot {
    job: MetricJob,
    cycle: u64,
    awaiting_echo: bool,
}

#[derive(Debug)]
pub struct JobBoard {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl JobBoard {
    /// Builds a board in the given order
    ///
    /// Ids are expected to be unique (`JobManifest` enforces it); a repeated id
    /// resolves to its first occurrence.
    pub fn new(jobs: Vec<MetricJob>) -> Self {
        let mut index = HashMap::with_capacity(jobs.len());
        for (i, job) in jobs.iter().enumerate() {
            index.entry(job.id.clone()).or_insert(i);
        }

        let slots = jobs
            .into_iter()
            .map(|job| Slot {
                job,
                cycle: 0,
                awaiting_echo: false,
            })
            .collect();

        Self { slots, index }
    }

    fn slot_mut(&mut self, id: &str) -> Option<&mut Slot> {
        let i = *self.index.get(id)?;
        self.slots.get_mut(i)
    }

    pub fn get(&self, id: &str) -> Option<&MetricJob> {
        self.index.get(id).map(|&i| &self.slots[i].job)
    }

    /// Current jobs in display order
    pub fn jobs(&self) -> Vec<MetricJob> {
        self.slots.iter().map(|slot| slot.job.clone()).collect()
    }

    /// Manual trigger: `idle | success | error → running`
    ///
    /// Returns `None` for unknown ids and jobs already running.
    pub fn begin(&mut self, id: &str) -> Option<Dispatch> {
        let slot = self.slot_mut(id)?;
        if slot.job.status == JobStatus::Running {
            return None;
        }

        slot.job.status = JobStatus::Running;
        slot.cycle += 1;
        slot.awaiting_echo = false;

        Some(Dispatch {
            job_id: slot.job.id.clone(),
            endpoint: slot.job.endpoint.clone(),
            cycle: slot.cycle,
        })
    }

    /// Trigger response for `cycle`
    pub fn finish(&mut self, id: &str, cycle: u64, succeeded: bool, now: DateTime<Utc>) -> Outcome {
        let Some(slot) = self.slot_mut(id) else {
            return Outcome::Unchanged;
        };
        if slot.cycle != cycle || slot.job.status != JobStatus::Running {
            return Outcome::Unchanged;
        }

        slot.job.last_run = LastRun::At(now);
        if succeeded {
            slot.job.status = JobStatus::Success;
            slot.awaiting_echo = true;
            Outcome::Succeeded
        } else {
            slot.job.status = JobStatus::Error;
            Outcome::Failed
        }
    }

    /// Push completion event received at `now`
    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Outcome {
        let Some(slot) = self.slot_mut(id) else {
            return Outcome::Unchanged;
        };

        match slot.job.status {
            JobStatus::Running => {}
            JobStatus::Success => {
                slot.awaiting_echo = false;
                return Outcome::Unchanged;
            }
            JobStatus::Idle if slot.awaiting_echo => {
                slot.awaiting_echo = false;
                return Outcome::Unchanged;
            }
            JobStatus::Idle => {}
            JobStatus::Error => return Outcome::Unchanged,
        }

        slot.job.status = JobStatus::Success;
        slot.job.last_run = LastRun::At(now);
        slot.awaiting_echo = false;
        Outcome::Succeeded
    }

    /// Echo window elapsed: later completions are treated as new runs
    pub fn expire_echo(&mut self, id: &str) -> bool {
        match self.slot_mut(id) {
            Some(slot) if slot.awaiting_echo => {
                slot.awaiting_echo = false;
                true
            }
            _ => false,
        }
    }

    /// Revert timer fired: `success → idle`
    pub fn revert(&mut self, id: &str) -> bool {
        match self.slot_mut(id) {
            Some(slot) if slot.job.status == JobStatus::Success => {
                slot.job.status = JobStatus::Idle;
                true
            }
            _ => false,
        }
    }
}
