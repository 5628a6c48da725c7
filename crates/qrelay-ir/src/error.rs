//! Errors from building circuits and noise channels.

use thiserror::Error;

use crate::qubit::{ClbitId, QubitId};

/// Rejections raised while a circuit is being built.
///
/// Operand errors carry the gate name when one is known, shown as
/// `(gate: h)` at the end of the message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    #[error("qubit {qubit} is not part of the circuit{}", gate_suffix(.gate_name.as_deref()))]
    QubitNotFound {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    #[error("clbit {clbit} is not part of the circuit{}", gate_suffix(.gate_name.as_deref()))]
    ClbitNotFound {
        clbit: ClbitId,
        gate_name: Option<String>,
    },

    /// A condition names a register the circuit never declared.
    #[error("no classical register named '{0}'")]
    RegisterNotFound(String),

    /// Wires no longer form single in-to-out paths.
    #[error("corrupt circuit graph: {0}")]
    InvalidDag(String),

    #[error("gate '{gate_name}' acts on {expected} qubits, got {got}")]
    QubitCountMismatch {
        gate_name: String,
        expected: u32,
        got: u32,
    },

    #[error("qubit {qubit} appears twice{}", gate_suffix(.gate_name.as_deref()))]
    DuplicateQubit {
        qubit: QubitId,
        gate_name: Option<String>,
    },

    /// `Circuit::compose` was handed a circuit it cannot splice in.
    #[error("cannot compose '{name}': {reason}")]
    ComposeMismatch { name: String, reason: String },

    /// Channel parameters outside their physical range.
    #[error("invalid {channel} channel: {reason}")]
    InvalidNoise { channel: String, reason: String },
}

fn gate_suffix(gate_name: Option<&str>) -> String {
    gate_name.map(|name| format!(" (gate: {name})")).unwrap_or_default()
}

pub type IrResult<T> = Result<T, IrError>;
