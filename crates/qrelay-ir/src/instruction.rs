//! A single circuit step: what runs, and on which bits.

use serde::{Deserialize, Serialize};

use crate::gate::Gate;
use crate::noise::NoiseChannel;
use crate::qubit::{ClbitId, QubitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    Gate(Gate),
    /// Z-basis measurement into one classical bit.
    Measure,
    /// Force the qubit back to |0⟩.
    Reset,
    Barrier,
    /// Idle time, in the same unit as the noise model's T1 and T2.
    Delay { duration: f64 },
    NoiseChannel { channel: NoiseChannel },
}

/// An operation together with its operands.
///
/// `clbits` are the measurement targets for `Measure` and the bits read by
/// a conditional gate. The DAG wires both, which keeps a feed-forward gate
/// behind the measurement that feeds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub qubits: Vec<QubitId>,
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    fn on(kind: InstructionKind, qubits: Vec<QubitId>) -> Self {
        Self {
            kind,
            qubits,
            clbits: Vec::new(),
        }
    }

    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::on(InstructionKind::Gate(gate.into()), qubits.into_iter().collect())
    }

    /// A gate that also reads `reads`.
    pub fn conditional_gate(
        gate: Gate,
        qubits: impl IntoIterator<Item = QubitId>,
        reads: impl IntoIterator<Item = ClbitId>,
    ) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits: reads.into_iter().collect(),
        }
    }

    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    pub fn reset(qubit: QubitId) -> Self {
        Self::on(InstructionKind::Reset, vec![qubit])
    }

    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::on(InstructionKind::Barrier, qubits.into_iter().collect())
    }

    pub fn delay(qubit: QubitId, duration: f64) -> Self {
        Self::on(InstructionKind::Delay { duration }, vec![qubit])
    }

    pub fn noise_channel(channel: NoiseChannel, qubit: QubitId) -> Self {
        Self::on(InstructionKind::NoiseChannel { channel }, vec![qubit])
    }

    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// `true` for a gate guarded by a classical condition.
    pub fn is_conditional(&self) -> bool {
        self.as_gate().is_some_and(Gate::is_conditional)
    }

    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// The key noise models look errors up by.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
            InstructionKind::Delay { .. } => "delay",
            InstructionKind::NoiseChannel { channel } => channel.name(),
        }
    }
}
