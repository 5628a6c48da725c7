//! Single-qubit state tomography.
//!
//! The target qubit is measured in the X, Y and Z bases by rotating it onto
//! Z before read-out (H for X, S†·H for Y). Each basis yields marginal counts
//! of the read-out bit; their population differences are the Pauli
//! expectation values, which define the Bloch vector of the state.

use std::fmt;

use qrelay_hal::{Backend, Counts};
use qrelay_ir::{Circuit, ClbitId, QubitId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::density::{BlochVector, DensityMatrix, reconstruct_density};
use crate::error::TeleportResult;
use crate::marginal::{BitSelector, MarginalCounts, parse_pattern};
use crate::teleport::TeleportationCircuit;

/// A Pauli measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementBasis {
    /// Pauli X.
    X,
    /// Pauli Y.
    Y,
    /// Pauli Z (computational basis).
    Z,
}

impl MeasurementBasis {
    /// All three bases, in X, Y, Z order.
    pub const ALL: [MeasurementBasis; 3] =
        [MeasurementBasis::X, MeasurementBasis::Y, MeasurementBasis::Z];

    /// Append the rotation that maps this basis onto Z.
    pub fn rotate(self, circuit: &mut Circuit, qubit: QubitId) -> TeleportResult<()> {
        match self {
            MeasurementBasis::X => {
                circuit.h(qubit)?;
            }
            MeasurementBasis::Y => {
                circuit.sdg(qubit)?.h(qubit)?;
            }
            MeasurementBasis::Z => {}
        }
        Ok(())
    }

    /// Single-letter label.
    pub fn label(self) -> &'static str {
        match self {
            MeasurementBasis::X => "X",
            MeasurementBasis::Y => "Y",
            MeasurementBasis::Z => "Z",
        }
    }
}

impl fmt::Display for MeasurementBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalised population difference `(n0 − n1) / (n0 + n1)`.
///
/// Returns exactly 0.0 when there are no counts.
pub fn expectation(counts: &MarginalCounts) -> f64 {
    let total = counts.total();
    if total == 0 {
        return 0.0;
    }
    (counts.zeros() as f64 - counts.ones() as f64) / total as f64
}

/// Marginal counts of the read-out bit in each basis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisCounts {
    pub x: MarginalCounts,
    pub y: MarginalCounts,
    pub z: MarginalCounts,
}

impl BasisCounts {
    /// Counts for one basis.
    pub fn get(&self, basis: MeasurementBasis) -> &MarginalCounts {
        match basis {
            MeasurementBasis::X => &self.x,
            MeasurementBasis::Y => &self.y,
            MeasurementBasis::Z => &self.z,
        }
    }
}

/// Expectation values `(⟨X⟩, ⟨Y⟩, ⟨Z⟩)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpectationTriple {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ExpectationTriple {
    /// Estimate each axis independently from its basis counts.
    pub fn from_counts(counts: &BasisCounts) -> Self {
        Self {
            x: expectation(&counts.x),
            y: expectation(&counts.y),
            z: expectation(&counts.z),
        }
    }

    /// The raw, unclamped Bloch vector.
    pub fn bloch_vector(&self) -> BlochVector {
        BlochVector::new(self.x, self.y, self.z)
    }

    /// Density matrix with the Bloch clamp applied.
    pub fn reconstruct(&self) -> DensityMatrix {
        reconstruct_density(self.x, self.y, self.z)
    }
}

impl fmt::Display for ExpectationTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "⟨X⟩={:+.4} ⟨Y⟩={:+.4} ⟨Z⟩={:+.4}", self.x, self.y, self.z)
    }
}

/// Outcome of a tomography run.
#[derive(Debug, Clone, Serialize)]
pub struct TomographyResult {
    /// Marginal counts per basis.
    pub counts: BasisCounts,
    /// Estimated expectation values.
    pub expectations: ExpectationTriple,
    /// Reconstructed state.
    pub density: DensityMatrix,
}

impl TomographyResult {
    /// Estimate and reconstruct from per-basis counts.
    pub fn from_counts(counts: BasisCounts) -> Self {
        let expectations = ExpectationTriple::from_counts(&counts);
        Self {
            counts,
            expectations,
            density: expectations.reconstruct(),
        }
    }
}

/// Run a copy of `circuit` with `qubit` rotated into `basis` and measured
/// into `clbit`, returning the joint counts.
pub async fn measure_in_basis<B: Backend + ?Sized>(
    circuit: &Circuit,
    qubit: QubitId,
    clbit: ClbitId,
    basis: MeasurementBasis,
    backend: &B,
    shots: u32,
) -> TeleportResult<Counts> {
    let mut measured = circuit.clone();
    basis.rotate(&mut measured, qubit)?;
    measured.measure(qubit, clbit)?;

    let result = backend.run(&measured, shots).await?;
    debug!(%basis, outcomes = result.counts.len(), "basis measurement finished");
    Ok(result.counts)
}

/// Measure all three bases concurrently.
async fn measure_all_bases<B: Backend + ?Sized>(
    circuit: &Circuit,
    qubit: QubitId,
    clbit: ClbitId,
    backend: &B,
    shots: u32,
) -> TeleportResult<[Counts; 3]> {
    let (x, y, z) = futures::try_join!(
        measure_in_basis(circuit, qubit, clbit, MeasurementBasis::X, backend, shots),
        measure_in_basis(circuit, qubit, clbit, MeasurementBasis::Y, backend, shots),
        measure_in_basis(circuit, qubit, clbit, MeasurementBasis::Z, backend, shots),
    )?;
    Ok([x, y, z])
}

/// Reconstruct the state of `qubit` at the end of `circuit`.
#[instrument(skip(circuit, backend), fields(circuit = circuit.name()))]
pub async fn single_qubit_tomography<B: Backend + ?Sized>(
    circuit: &Circuit,
    qubit: QubitId,
    clbit: ClbitId,
    backend: &B,
    shots: u32,
) -> TeleportResult<TomographyResult> {
    let selector = BitSelector::new(circuit);
    let [x, y, z] = measure_all_bases(circuit, qubit, clbit, backend, shots).await?;

    let counts = BasisCounts {
        x: selector.marginalize(&x, clbit)?,
        y: selector.marginalize(&y, clbit)?,
        z: selector.marginalize(&z, clbit)?,
    };
    Ok(TomographyResult::from_counts(counts))
}

/// Reconstruct Bob's state after feed-forward.
///
/// `tc` should already carry the corrections (see
/// [`crate::teleport::apply_feedforward`]).
pub async fn tomography_after_feedforward<B: Backend + ?Sized>(
    tc: &TeleportationCircuit,
    backend: &B,
    shots: u32,
) -> TeleportResult<TomographyResult> {
    single_qubit_tomography(&tc.circuit, tc.bob_qubit, tc.bob_bit, backend, shots).await
}

/// Reconstruct Bob's state conditioned on the Bell-measurement outcome.
///
/// `outcome` is the `a0 a1` pattern (`"00"`..`"11"`). Bob is measured
/// without corrections; only shots whose Bell bits match contribute. If the
/// pattern never occurs the result is the maximally mixed state.
#[instrument(skip(tc, backend))]
pub async fn tomography_postselected<B: Backend + ?Sized>(
    tc: &TeleportationCircuit,
    backend: &B,
    shots: u32,
    outcome: &str,
) -> TeleportResult<TomographyResult> {
    parse_pattern(outcome)?;

    let selector = BitSelector::new(&tc.circuit);
    let aux = [tc.a0_bit, tc.a1_bit];
    let [x, y, z] = measure_all_bases(&tc.circuit, tc.bob_qubit, tc.bob_bit, backend, shots).await?;

    let counts = BasisCounts {
        x: selector.postselect(&x, tc.bob_bit, aux, outcome)?,
        y: selector.postselect(&y, tc.bob_bit, aux, outcome)?,
        z: selector.postselect(&z, tc.bob_bit, aux, outcome)?,
    };
    debug!(
        selected = counts.z.total(),
        shots, "post-selected Bell outcome"
    );
    Ok(TomographyResult::from_counts(counts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expectation_empty_is_zero() {
        assert_eq!(expectation(&MarginalCounts::default()), 0.0);
    }

    #[test]
    fn test_expectation_values() {
        assert_eq!(expectation(&MarginalCounts::new(10, 0)), 1.0);
        assert_eq!(expectation(&MarginalCounts::new(0, 4)), -1.0);
        assert!((expectation(&MarginalCounts::new(3, 1)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_basis_rotations() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        MeasurementBasis::Z.rotate(&mut circuit, QubitId(0)).unwrap();
        assert_eq!(circuit.dag().num_ops(), 0);
        MeasurementBasis::X.rotate(&mut circuit, QubitId(0)).unwrap();
        assert_eq!(circuit.dag().num_ops(), 1);
        MeasurementBasis::Y.rotate(&mut circuit, QubitId(0)).unwrap();
        let names: Vec<_> = circuit
            .dag()
            .topological_ops()
            .map(|(_, inst)| inst.name().to_string())
            .collect();
        assert_eq!(names, vec!["h", "sdg", "h"]);
    }

    #[test]
    fn test_empty_counts_reconstruct_mixed() {
        let result = TomographyResult::from_counts(BasisCounts::default());
        assert_eq!(result.expectations, ExpectationTriple::default());
        assert_eq!(result.density, DensityMatrix::maximally_mixed());
    }
}
