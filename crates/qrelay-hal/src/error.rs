//! Errors raised by backends and the jobs they run.

use thiserror::Error;

use crate::job::{JobId, JobStatus};

/// Backend and job errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Shot count outside the backend's accepted range.
    #[error("invalid shot count: {0}")]
    InvalidShots(String),

    /// Circuit wider than the backend allows.
    #[error("circuit needs {required} qubits, backend allows {available}")]
    CircuitTooLarge { required: usize, available: u32 },

    /// Circuit failed backend validation.
    #[error("circuit rejected: {0}")]
    InvalidCircuit(String),

    #[error("unknown job {0}")]
    JobNotFound(JobId),

    /// Result requested before the job finished.
    #[error("job {job} has no result yet ({status})")]
    ResultNotReady { job: JobId, status: JobStatus },

    #[error("job failed: {0}")]
    JobFailed(String),

    #[error("job was cancelled")]
    JobCancelled,

    #[error("timed out waiting for job {0}")]
    Timeout(JobId),

    /// Backend settings out of range.
    #[error("backend configuration: {0}")]
    Configuration(String),

    /// Backend settings that do not deserialize.
    #[error("malformed backend settings: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for backend operations.
pub type HalResult<T> = Result<T, HalError>;
