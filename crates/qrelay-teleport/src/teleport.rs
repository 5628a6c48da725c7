//! Teleportation circuit construction.
//!
//! The protocol uses three qubits:
//!
//! ```text
//! psi:   ─Ry(θ)─Rz(φ)─░──────────░──■──H──M(a0)─░─
//! alice: ─────────────░──H──■────░──X─────M(a1)─░─
//! bob:   ─────────────░─────X────░──────────────░─ [Z if a0] [X if a1]
//! ```
//!
//! Classical registers are declared as `c_bob`, `c_a0`, `c_a1`, so outcome
//! keys read `"a1 a0 bob"`.

use qrelay_ir::{Circuit, ClbitId, QubitId, StandardGate};
use tracing::debug;

use crate::density::SingleQubitState;
use crate::error::TeleportResult;

/// Prepare `qubit` in `Rz(φ)·Ry(θ)|0⟩`.
pub fn prepare_state(
    circuit: &mut Circuit,
    qubit: QubitId,
    theta: f64,
    phi: f64,
) -> TeleportResult<()> {
    circuit.ry(theta, qubit)?.rz(phi, qubit)?;
    Ok(())
}

/// The state [`prepare_state`] produces, computed directly.
pub fn ideal_state(theta: f64, phi: f64) -> SingleQubitState {
    SingleQubitState::from_rotations(theta, phi)
}

/// A two-qubit circuit producing `(|00⟩ + |11⟩)/√2`.
pub fn generate_bell_pair() -> TeleportResult<Circuit> {
    let mut bell = Circuit::with_size("bell_pair", 2, 0);
    bell.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
    Ok(bell)
}

/// Copy of `bell` with an identity gate appended on every qubit.
///
/// Noise models keyed on `"id"` then act on both halves of the pair.
pub fn degrade_bell_pair(bell: &Circuit) -> TeleportResult<Circuit> {
    let mut degraded = bell.clone();
    let qubits: Vec<_> = bell.qubits().iter().map(|q| q.id).collect();
    for q in qubits {
        degraded.id(q)?;
    }
    Ok(degraded)
}

/// Copy of `circuit` with a barrier and a measurement of every qubit into a
/// fresh `meas` register.
pub fn measure_all(circuit: &Circuit) -> TeleportResult<Circuit> {
    let mut measured = circuit.clone();
    let qubits: Vec<_> = circuit.qubits().iter().map(|q| q.id).collect();
    let meas = measured.add_creg("meas", qubits.len() as u32);
    measured.barrier_all()?;
    for (q, c) in qubits.into_iter().zip(meas) {
        measured.measure(q, c)?;
    }
    Ok(measured)
}

/// A teleportation circuit together with the handles needed to finish it.
#[derive(Debug, Clone)]
pub struct TeleportationCircuit {
    /// The circuit, up to and including the Bell measurement.
    pub circuit: Circuit,
    /// The qubit holding the state to teleport.
    pub psi_qubit: QubitId,
    /// Alice's half of the Bell pair.
    pub alice_qubit: QubitId,
    /// Bob's half of the Bell pair.
    pub bob_qubit: QubitId,
    /// Bell-measurement result of `psi` (drives the Z correction).
    pub a0_bit: ClbitId,
    /// Bell-measurement result of Alice's qubit (drives the X correction).
    pub a1_bit: ClbitId,
    /// Bit reserved for reading out Bob's qubit.
    pub bob_bit: ClbitId,
}

impl TeleportationCircuit {
    /// Copy with feed-forward corrections appended.
    pub fn with_feedforward(&self) -> TeleportResult<Self> {
        let mut copy = self.clone();
        apply_feedforward(&mut copy)?;
        Ok(copy)
    }
}

/// Build the teleportation circuit for the state `Rz(φ)·Ry(θ)|0⟩`.
///
/// `bell_pair` replaces the ideal Bell pair when given; it must be a
/// two-qubit circuit without classical bits (for example the output of
/// [`degrade_bell_pair`]).
pub fn build_teleportation_circuit(
    theta: f64,
    phi: f64,
    bell_pair: Option<&Circuit>,
) -> TeleportResult<TeleportationCircuit> {
    let mut circuit = Circuit::new("teleportation");
    let psi = circuit.add_qreg("psi", 1)[0];
    let alice = circuit.add_qreg("alice", 1)[0];
    let bob = circuit.add_qreg("bob", 1)[0];
    let bob_bit = circuit.add_creg("c_bob", 1)[0];
    let a0 = circuit.add_creg("c_a0", 1)[0];
    let a1 = circuit.add_creg("c_a1", 1)[0];

    prepare_state(&mut circuit, psi, theta, phi)?;
    circuit.barrier_all()?;

    let ideal;
    let pair = match bell_pair {
        Some(pair) => pair,
        None => {
            ideal = generate_bell_pair()?;
            &ideal
        }
    };
    circuit.compose(pair, &[alice, bob])?;
    circuit.barrier_all()?;

    circuit
        .cx(psi, alice)?
        .h(psi)?
        .measure(psi, a0)?
        .measure(alice, a1)?
        .barrier_all()?;

    debug!(
        theta,
        phi,
        custom_pair = bell_pair.is_some(),
        depth = circuit.depth(),
        "built teleportation circuit"
    );

    Ok(TeleportationCircuit {
        circuit,
        psi_qubit: psi,
        alice_qubit: alice,
        bob_qubit: bob,
        a0_bit: a0,
        a1_bit: a1,
        bob_bit,
    })
}

/// Append the classically controlled corrections: Z on Bob if `a0 == 1`,
/// then X on Bob if `a1 == 1`, then a barrier.
pub fn apply_feedforward(tc: &mut TeleportationCircuit) -> TeleportResult<()> {
    tc.circuit
        .if_bit(StandardGate::Z, tc.bob_qubit, tc.a0_bit, true)?
        .if_bit(StandardGate::X, tc.bob_qubit, tc.a1_bit, true)?
        .barrier_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrelay_ir::InstructionKind;

    #[test]
    fn test_bell_pair_shape() {
        let bell = generate_bell_pair().unwrap();
        assert_eq!(bell.num_qubits(), 2);
        assert_eq!(bell.num_clbits(), 0);
        assert_eq!(bell.dag().num_ops(), 2);
    }

    #[test]
    fn test_degrade_appends_identities() {
        let bell = generate_bell_pair().unwrap();
        let degraded = degrade_bell_pair(&bell).unwrap();
        let ids = degraded
            .dag()
            .topological_ops()
            .filter(|(_, inst)| inst.name() == "id")
            .count();
        assert_eq!(ids, 2);
        // the input is left untouched
        assert_eq!(bell.dag().num_ops(), 2);
    }

    #[test]
    fn test_teleportation_layout() {
        let tc = build_teleportation_circuit(0.5, 1.0, None).unwrap();
        let layout = tc.circuit.classical_layout();
        assert_eq!(layout.position_of(tc.a1_bit), Some(0));
        assert_eq!(layout.position_of(tc.a0_bit), Some(1));
        assert_eq!(layout.position_of(tc.bob_bit), Some(2));
        assert_eq!(tc.circuit.num_qubits(), 3);
    }

    #[test]
    fn test_feedforward_after_measurements() {
        let tc = build_teleportation_circuit(0.5, 1.0, None)
            .unwrap()
            .with_feedforward()
            .unwrap();
        let ops: Vec<_> = tc.circuit.dag().topological_ops().collect();
        let last_measure = ops
            .iter()
            .filter(|(_, inst)| inst.is_measure())
            .map(|(idx, _)| *idx)
            .last()
            .unwrap();
        let conditionals: Vec<_> = ops
            .iter()
            .filter(|(_, inst)| inst.is_conditional())
            .collect();
        assert_eq!(conditionals.len(), 2);
        for (idx, _) in conditionals {
            assert!(tc.circuit.dag().depends_on(*idx, last_measure));
        }
    }

    #[test]
    fn test_custom_bell_pair_is_composed() {
        let degraded = degrade_bell_pair(&generate_bell_pair().unwrap()).unwrap();
        let tc = build_teleportation_circuit(0.1, 0.2, Some(&degraded)).unwrap();
        let ids = tc
            .circuit
            .dag()
            .topological_ops()
            .filter(|(_, inst)| {
                matches!(&inst.kind, InstructionKind::Gate(g) if g.name() == "id")
            })
            .count();
        assert_eq!(ids, 2);
    }

    #[test]
    fn test_bell_pair_with_clbits_rejected() {
        let measured = measure_all(&generate_bell_pair().unwrap()).unwrap();
        assert!(build_teleportation_circuit(0.1, 0.2, Some(&measured)).is_err());
    }

    #[test]
    fn test_measure_all() {
        let measured = measure_all(&generate_bell_pair().unwrap()).unwrap();
        assert_eq!(measured.num_clbits(), 2);
        assert!(measured.creg("meas").is_some());
    }
}
