//! How qrelay talks to whatever runs its circuits.
//!
//! A [`Backend`] takes a circuit and a shot count and eventually yields an
//! [`ExecutionResult`]: a [`Counts`] histogram keyed by outcome strings. The
//! job lifecycle lives in [`job`]; [`Capabilities`] says what a backend will
//! accept.
//!
//! ```ignore
//! use qrelay_adapter_sim::SimulatorBackend;
//! use qrelay_hal::Backend;
//! use qrelay_ir::Circuit;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let backend = SimulatorBackend::new();
//! let result = backend.run(&Circuit::bell()?, 1000).await?;
//! assert_eq!(result.counts.total_shots(), 1000);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendAvailability, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, GateSet, NoiseProfile};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
