//! The backend contract.
//!
//! A backend accepts a circuit, hands back a [`JobId`] and later a result:
//!
//! ```text
//!   validate() ──→ submit() ──→ status() … ──→ result()
//!                     └────────── wait() ─────────┘
//! ```
//!
//! [`Backend::run`] chains all of it for callers that only want counts.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use qrelay_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const WAIT_LIMIT: Duration = Duration::from_secs(300);

/// Named backend settings with free-form extras.
///
/// Extras are flattened, so `{"name": "sim", "seed": 3}` deserializes with
/// `seed` in [`BackendConfig::extra`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// An extra as an unsigned integer, if present and numeric.
    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra.get(key).and_then(serde_json::Value::as_u64)
    }
}

/// Something that executes circuits.
///
/// `capabilities` is fixed at construction. A job returned by `submit`
/// starts `Queued` or `Running`; `result` only succeeds once it is
/// `Completed`.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &Capabilities;

    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Check `circuit` against this backend without running it.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Poll until the job finishes, giving up after five minutes.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
        loop {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(reason) => return Err(HalError::JobFailed(reason)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {}
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(HalError::Timeout(job_id.clone()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Validate, submit and wait in one call.
    async fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        if let ValidationResult::Invalid { reasons } = self.validate(circuit).await? {
            return Err(HalError::InvalidCircuit(reasons.join("; ")));
        }
        let job_id = self.submit(circuit, shots).await?;
        self.wait(&job_id).await
    }
}

/// Whether a backend takes jobs right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendAvailability {
    pub accepting_jobs: bool,
    /// Jobs ahead of a new submission, when the backend knows.
    pub queue_depth: Option<u32>,
}

impl BackendAvailability {
    /// A local backend: always accepting, nothing queued.
    pub fn local() -> Self {
        Self {
            accepting_jobs: true,
            queue_depth: Some(0),
        }
    }
}

/// Outcome of [`Backend::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { reasons: Vec<String> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Construction from a [`BackendConfig`].
pub trait BackendFactory: Backend + Sized {
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}
