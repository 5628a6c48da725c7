//! Teleportation error types.

use thiserror::Error;

/// Result type for teleportation and tomography operations.
pub type TeleportResult<T> = Result<T, TeleportError>;

/// Errors that can occur while building, running or analysing a
/// teleportation experiment.
#[derive(Debug, Error)]
pub enum TeleportError {
    /// An outcome key is too short, or holds something other than 0/1 at a
    /// position we read.
    #[error("Malformed outcome '{outcome}': no bit at position {position}")]
    MalformedOutcome {
        /// The offending outcome key as reported by the backend.
        outcome: String,
        /// Whitespace-stripped position that was requested.
        position: usize,
    },

    /// The counts to marginalise contain no outcomes at all.
    #[error("Count set is empty")]
    EmptyCountSet,

    /// A post-selection pattern is not two characters of 0/1.
    #[error("Invalid post-selection pattern '{0}': expected one of 00, 01, 10, 11")]
    InvalidPattern(String),

    /// A classical bit is not part of the circuit's outcome layout.
    #[error("Classical bit {0} is not in the outcome layout")]
    UnknownClbit(u32),

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] qrelay_ir::IrError),

    /// Execution on the backend failed.
    #[error("Backend error: {0}")]
    Hal(#[from] qrelay_hal::HalError),

    /// A configuration value is out of range or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing an artefact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for TeleportError {
    fn from(e: serde_json::Error) -> Self {
        TeleportError::Config(e.to_string())
    }
}

impl From<serde_yaml_ng::Error> for TeleportError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        TeleportError::Config(e.to_string())
    }
}
