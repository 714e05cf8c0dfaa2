//! Job domain types

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A manually triggerable metrics-collection job
///
/// Descriptive fields are fixed for the lifetime of a panel session; only
/// `status` and `last_run` change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricJob {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub endpoint: String,
    pub status: JobStatus,
    pub last_run: LastRun,
}

impl MetricJob {
    /// Creates an idle job that has never run
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            endpoint: endpoint.into(),
            status: JobStatus::Idle,
            last_run: LastRun::Never,
        }
    }
}

/// Job status as shown on the panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Idle => "idle",
            JobStatus::Running => "running",
            JobStatus::Success => "success",
            JobStatus::Error => "error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a job last settled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "at")]
pub enum LastRun {
    #[default]
    Never,
    At(DateTime<Utc>),
}

impl LastRun {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            LastRun::Never => None,
            LastRun::At(at) => Some(*at),
        }
    }
}

impl fmt::Display for LastRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastRun::Never => f.write_str("Never"),
            LastRun::At(at) => write!(
                f,
                "{}",
                at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_idle_and_never_run() {
        let job = MetricJob::new("a", "A", "/a.svg", "/api/a");
        assert_eq!(job.status, JobStatus::Idle);
        assert_eq!(job.last_run, LastRun::Never);
        assert_eq!(job.last_run.to_string(), "Never");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&JobStatus::Success).unwrap();
        assert_eq!(json, "\"success\"");
        let status: JobStatus = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(status, JobStatus::Running);
    }
}
