//! Job bookkeeping.
//!
//! ```text
//!   Queued ──→ Running ──→ Completed
//!     │           ├──────→ Failed(reason)
//!     └───────────┴──────→ Cancelled
//! ```
//!
//! Once a job reaches a finished state it stays there.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier a backend hands out on submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed(String),
    Cancelled,
}

impl JobStatus {
    /// `true` for `Completed`, `Failed` and `Cancelled`.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => f.write_str("queued"),
            JobStatus::Running => f.write_str("running"),
            JobStatus::Completed => f.write_str("completed"),
            JobStatus::Failed(reason) => write!(f, "failed: {reason}"),
            JobStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// A submitted job and its timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub backend: String,
    pub shots: u32,
    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A queued job on `backend`.
    pub fn new(id: JobId, backend: impl Into<String>, shots: u32) -> Self {
        Self {
            id,
            backend: backend.into(),
            shots,
            status: JobStatus::Queued,
            submitted_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Move to `status`, stamping start and finish times.
    ///
    /// Returns `false` and leaves the job untouched if it already finished.
    pub fn transition(&mut self, status: JobStatus) -> bool {
        if self.status.is_finished() {
            return false;
        }
        let now = Utc::now();
        if status == JobStatus::Running {
            self.started_at.get_or_insert(now);
        }
        if status.is_finished() {
            self.finished_at = Some(now);
        }
        self.status = status;
        true
    }

    /// Wall-clock time between start and finish, once both are known.
    pub fn run_time(&self) -> Option<chrono::Duration> {
        Some(self.finished_at? - self.started_at?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_states() {
        assert!(!JobStatus::Queued.is_finished());
        assert!(!JobStatus::Running.is_finished());
        assert!(JobStatus::Completed.is_finished());
        assert!(JobStatus::Failed("boom".into()).is_finished());
        assert!(JobStatus::Cancelled.is_finished());
    }

    #[test]
    fn test_new_job_is_queued() {
        let job = Job::new(JobId::from("job-7"), "simulator", 500);
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.backend, "simulator");
        assert!(job.started_at.is_none());
        assert!(job.run_time().is_none());
    }

    #[test]
    fn test_finished_job_cannot_restart() {
        let mut job = Job::new(JobId::from("job-1"), "simulator", 10);
        assert!(job.transition(JobStatus::Running));
        assert!(job.transition(JobStatus::Completed));
        assert!(!job.transition(JobStatus::Running));

        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.run_time().is_some());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&JobStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
