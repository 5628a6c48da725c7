//! Builder for teleportation-style circuits.
//!
//! Every builder method validates its operands against the circuit's wires
//! and returns `&mut Self`, so construction chains with `?`.

use rustc_hash::FxHashMap;

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::{ClassicalCondition, ConditionTarget, Gate, StandardGate};
use crate::instruction::Instruction;
use crate::layout::ClassicalLayout;
use crate::noise::NoiseChannel;
use crate::qubit::{ClassicalRegister, Clbit, ClbitId, Qubit, QubitId};

fn wire_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// A named circuit: its wires, registers and the operation graph.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    qubits: Vec<Qubit>,
    clbits: Vec<Clbit>,
    /// Declaration order decides outcome-key layout.
    cregs: Vec<ClassicalRegister>,
    dag: CircuitDag,
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: Vec::new(),
            clbits: Vec::new(),
            cregs: Vec::new(),
            dag: CircuitDag::new(),
        }
    }

    /// A circuit of `num_qubits` anonymous qubits and `num_clbits` loose bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.push_qubit(None);
        }
        for _ in 0..num_clbits {
            circuit.push_clbit(None);
        }
        circuit
    }

    fn push_qubit(&mut self, register: Option<(&str, u32)>) -> QubitId {
        let id = QubitId(wire_index(self.qubits.len()));
        self.qubits.push(match register {
            Some((name, i)) => Qubit::with_register(id, name, i),
            None => Qubit::new(id),
        });
        self.dag.add_qubit(id);
        id
    }

    fn push_clbit(&mut self, register: Option<(&str, u32)>) -> ClbitId {
        let id = ClbitId(wire_index(self.clbits.len()));
        self.clbits.push(match register {
            Some((name, i)) => Clbit::with_register(id, name, i),
            None => Clbit::new(id),
        });
        self.dag.add_clbit(id);
        id
    }

    /// Declare a named quantum register and return its qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        (0..size).map(|i| self.push_qubit(Some((&name, i)))).collect()
    }

    /// Declare a named classical register and return its bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        let bits: Vec<_> = (0..size).map(|i| self.push_clbit(Some((&name, i)))).collect();
        self.cregs.push(ClassicalRegister {
            name,
            bits: bits.clone(),
        });
        bits
    }

    fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    /// Append any gate on the given qubits.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    /// Explicit identity, a slot for gate noise.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::I, [qubit])
    }

    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, [qubit])
    }

    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, [qubit])
    }

    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Sdg, [qubit])
    }

    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Ry(theta), [qubit])
    }

    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rz(theta), [qubit])
    }

    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    /// Append `gate` guarded by `condition`.
    ///
    /// The gate is wired to every bit the condition reads, so it lands after
    /// the measurements that write them.
    fn conditional(
        &mut self,
        gate: StandardGate,
        qubit: QubitId,
        condition: ClassicalCondition,
    ) -> IrResult<&mut Self> {
        let reads = match &condition.target {
            ConditionTarget::Bit(clbit) => vec![*clbit],
            ConditionTarget::Register(name) => self
                .creg(name)
                .ok_or_else(|| IrError::RegisterNotFound(name.clone()))?
                .bits
                .clone(),
        };
        let gate = Gate::standard(gate).with_condition(condition);
        self.push(Instruction::conditional_gate(gate, [qubit], reads))
    }

    /// Apply `gate` to `qubit` when `clbit` reads `value`.
    pub fn if_bit(
        &mut self,
        gate: StandardGate,
        qubit: QubitId,
        clbit: ClbitId,
        value: bool,
    ) -> IrResult<&mut Self> {
        self.conditional(gate, qubit, ClassicalCondition::bit(clbit, value))
    }

    /// Apply `gate` to `qubit` when `register` reads `value`.
    pub fn if_register(
        &mut self,
        gate: StandardGate,
        qubit: QubitId,
        register: &str,
        value: u64,
    ) -> IrResult<&mut Self> {
        self.conditional(gate, qubit, ClassicalCondition::register(register, value))
    }

    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::reset(qubit))
    }

    /// Barrier across every qubit.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.push(Instruction::barrier(qubits))
    }

    pub fn delay(&mut self, qubit: QubitId, duration: f64) -> IrResult<&mut Self> {
        self.push(Instruction::delay(qubit, duration))
    }

    pub fn noise(&mut self, channel: NoiseChannel, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::noise_channel(channel, qubit))
    }

    /// Append all of `other`, sending its `i`-th qubit to `qubit_map[i]`.
    ///
    /// `other` must be purely quantum.
    pub fn compose(&mut self, other: &Circuit, qubit_map: &[QubitId]) -> IrResult<&mut Self> {
        let mismatch = |reason: String| IrError::ComposeMismatch {
            name: other.name.clone(),
            reason,
        };
        if qubit_map.len() != other.num_qubits() {
            return Err(mismatch(format!(
                "qubit map has {} entries, circuit has {} qubits",
                qubit_map.len(),
                other.num_qubits()
            )));
        }
        if other.num_clbits() > 0 {
            return Err(mismatch("circuits with classical bits cannot be composed".into()));
        }

        let mapping: FxHashMap<QubitId, QubitId> =
            other.qubits.iter().map(|q| q.id).zip(qubit_map.iter().copied()).collect();

        for (_, inst) in other.dag.topological_ops() {
            let mut inst = inst.clone();
            for q in &mut inst.qubits {
                *q = mapping[&*q];
            }
            self.dag.apply(inst)?;
        }
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    pub fn creg(&self, name: &str) -> Option<&ClassicalRegister> {
        self.cregs.iter().find(|r| r.name == name)
    }

    /// Where each classical bit lands in an outcome key.
    pub fn classical_layout(&self) -> ClassicalLayout {
        let loose: Vec<_> = self
            .clbits
            .iter()
            .filter(|c| c.register.is_none())
            .map(|c| c.id)
            .collect();
        ClassicalLayout::new(&self.cregs, &loose)
    }

    /// Two qubits in a Bell pair, both measured.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        let (q0, q1) = (QubitId(0), QubitId(1));
        circuit
            .h(q0)?
            .cx(q0, q1)?
            .measure(q0, ClbitId(0))?
            .measure(q1, ClbitId(1))?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let qreg = circuit.add_qreg("q", 3);
        let c_bob = circuit.add_creg("c_bob", 1);
        let c_a0 = circuit.add_creg("c_a0", 1);

        assert_eq!(qreg.len(), 3);
        assert_eq!(circuit.num_clbits(), 2);
        assert!(circuit.creg("c_bob").is_some());
        assert_eq!(circuit.creg("c_a0").map(|r| r.bits.clone()), Some(c_a0));
        assert_eq!(circuit.classical_layout().position_of(c_bob[0]), Some(1));
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 1, 1);
        circuit
            .ry(PI / 3.0, QubitId(0))
            .unwrap()
            .rz(PI / 2.0, QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();

        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_if_register_resolves_bits() {
        let mut circuit = Circuit::new("ff");
        let q = circuit.add_qreg("q", 2);
        let c = circuit.add_creg("m", 2);
        circuit.measure(q[0], c[0]).unwrap().measure(q[1], c[1]).unwrap();
        circuit.if_register(StandardGate::X, q[0], "m", 3).unwrap();

        let (_, last) = circuit.dag().topological_ops().last().unwrap();
        assert!(last.is_conditional());
        assert_eq!(last.clbits, c);

        let err = circuit.if_register(StandardGate::X, q[0], "nope", 1);
        assert!(matches!(err, Err(IrError::RegisterNotFound(_))));
    }

    #[test]
    fn test_compose_maps_qubits() {
        let mut pair = Circuit::with_size("pair", 2, 0);
        pair.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

        let mut host = Circuit::with_size("host", 3, 0);
        host.compose(&pair, &[QubitId(1), QubitId(2)]).unwrap();

        let ops: Vec<_> = host.dag().topological_ops().map(|(_, i)| i.clone()).collect();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].qubits, vec![QubitId(1)]);
        assert_eq!(ops[1].qubits, vec![QubitId(1), QubitId(2)]);
    }

    #[test]
    fn test_compose_rejects_bad_map() {
        let pair = Circuit::with_size("pair", 2, 0);
        let mut host = Circuit::with_size("host", 3, 0);
        assert!(matches!(
            host.compose(&pair, &[QubitId(0)]),
            Err(IrError::ComposeMismatch { .. })
        ));

        let measured = Circuit::bell().unwrap();
        assert!(host.compose(&measured, &[QubitId(0), QubitId(1)]).is_err());
    }
}
