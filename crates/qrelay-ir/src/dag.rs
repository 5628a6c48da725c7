//! Wire-ordered dependency graph behind [`Circuit`](crate::Circuit).
//!
//! Each qubit and classical bit is a wire running from an `In` node to an
//! `Out` node. Appending an instruction splices it onto the end of every
//! wire it touches, so two operations are ordered exactly when some wire
//! connects them.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

pub type NodeIndex = PetNodeIndex<u32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Wire {
    Quantum(QubitId),
    Classical(ClbitId),
}

#[derive(Debug, Clone)]
enum Node {
    In,
    Out,
    Op(Instruction),
}

/// Append-only circuit DAG.
///
/// Node indices grow with insertion, so iterating operation nodes by index
/// is already a topological order.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<Node, Wire, u32>,
    inputs: FxHashMap<Wire, NodeIndex>,
    outputs: FxHashMap<Wire, NodeIndex>,
    /// Last node on each wire before its `Out` node.
    tail: FxHashMap<Wire, NodeIndex>,
    num_qubits: usize,
    num_clbits: usize,
}

impl CircuitDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a qubit wire. Adding the same qubit twice is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.add_wire(Wire::Quantum(qubit)) {
            self.num_qubits += 1;
        }
    }

    /// Register a classical wire. Adding the same bit twice is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.add_wire(Wire::Classical(clbit)) {
            self.num_clbits += 1;
        }
    }

    fn add_wire(&mut self, wire: Wire) -> bool {
        if self.inputs.contains_key(&wire) {
            return false;
        }
        let start = self.graph.add_node(Node::In);
        let end = self.graph.add_node(Node::Out);
        self.graph.add_edge(start, end, wire);
        self.inputs.insert(wire, start);
        self.outputs.insert(wire, end);
        self.tail.insert(wire, start);
        true
    }

    /// Append `instruction` after everything already on its wires.
    ///
    /// Fails without touching the graph if a gate gets the wrong number of
    /// qubits, an operand is unknown, or a qubit is listed twice.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.kind.num_qubits();
            let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !self.inputs.contains_key(&Wire::Quantum(qubit)) {
                return Err(IrError::QubitNotFound { qubit, gate_name });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name });
            }
        }
        for &clbit in &instruction.clbits {
            if !self.inputs.contains_key(&Wire::Classical(clbit)) {
                return Err(IrError::ClbitNotFound { clbit, gate_name });
            }
        }

        let wires: Vec<Wire> = instruction
            .qubits
            .iter()
            .map(|&q| Wire::Quantum(q))
            .chain(instruction.clbits.iter().map(|&c| Wire::Classical(c)))
            .collect();

        let node = self.graph.add_node(Node::Op(instruction));
        for wire in wires {
            self.splice(node, wire)?;
        }
        Ok(node)
    }

    fn splice(&mut self, node: NodeIndex, wire: Wire) -> IrResult<()> {
        let end = self.outputs[&wire];
        let prev = self.tail[&wire];

        let edge = self
            .graph
            .edges_directed(prev, Direction::Outgoing)
            .find(|e| *e.weight() == wire && e.target() == end)
            .map(|e| e.id())
            .ok_or_else(|| IrError::InvalidDag(format!("{wire:?} lost its closing edge")))?;

        self.graph.remove_edge(edge);
        self.graph.add_edge(prev, node, wire);
        self.graph.add_edge(node, end, wire);
        self.tail.insert(wire, node);
        Ok(())
    }

    /// Operations in insertion order, which is topological.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.graph.node_indices().filter_map(|idx| match &self.graph[idx] {
            Node::Op(inst) => Some((idx, inst)),
            Node::In | Node::Out => None,
        })
    }

    /// Whether some wire path leads from `earlier` to `later`.
    pub fn depends_on(&self, later: NodeIndex, earlier: NodeIndex) -> bool {
        later != earlier && petgraph::algo::has_path_connecting(&self.graph, earlier, later, None)
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn num_ops(&self) -> usize {
        self.graph.node_count() - 2 * self.inputs.len()
    }

    /// 1-based depth of each operation: one more than its deepest predecessor.
    fn op_depths(&self) -> FxHashMap<NodeIndex, usize> {
        let mut depths = FxHashMap::default();
        for (node, _) in self.topological_ops() {
            let deepest = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .filter_map(|e| depths.get(&e.source()).copied())
                .max()
                .unwrap_or(0);
            depths.insert(node, deepest + 1);
        }
        depths
    }

    /// Length of the longest chain of dependent operations.
    pub fn depth(&self) -> usize {
        self.op_depths().into_values().max().unwrap_or(0)
    }

    /// Operations grouped by depth. Within a layer they keep insertion order.
    pub fn layers(&self) -> Vec<Vec<&Instruction>> {
        let depths = self.op_depths();
        let mut layers: Vec<Vec<&Instruction>> = vec![Vec::new(); self.depth()];
        for (node, inst) in self.topological_ops() {
            if let Some(&d) = depths.get(&node) {
                layers[d - 1].push(inst);
            }
        }
        layers
    }

    /// Check that the graph is acyclic and every wire is one unbroken path.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("cycle in circuit graph".into()));
        }

        for (&wire, &start) in &self.inputs {
            let end = self.outputs[&wire];
            let mut at = start;
            for _ in 0..self.graph.node_count() {
                if at == end {
                    break;
                }
                let mut next = self
                    .graph
                    .edges_directed(at, Direction::Outgoing)
                    .filter(|e| *e.weight() == wire)
                    .map(|e| e.target());
                at = match (next.next(), next.next()) {
                    (Some(n), None) => n,
                    _ => {
                        return Err(IrError::InvalidDag(format!(
                            "{wire:?} does not continue uniquely from {at:?}"
                        )));
                    }
                };
            }
            if at != end {
                return Err(IrError::InvalidDag(format!("{wire:?} never reaches its output")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{ClassicalCondition, Gate, StandardGate};

    fn dag_with(qubits: u32, clbits: u32) -> CircuitDag {
        let mut dag = CircuitDag::new();
        for i in 0..qubits {
            dag.add_qubit(QubitId(i));
        }
        for i in 0..clbits {
            dag.add_clbit(ClbitId(i));
        }
        dag
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
        assert!(dag.layers().is_empty());
    }

    #[test]
    fn test_adding_a_wire_twice_is_a_no_op() {
        let mut dag = dag_with(1, 1);
        dag.add_qubit(QubitId(0));
        dag.add_clbit(ClbitId(0));
        assert_eq!(dag.num_qubits(), 1);
        assert_eq!(dag.num_clbits(), 1);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_bell_state_depth() {
        let mut dag = dag_with(2, 0);
        dag.apply(Instruction::gate(StandardGate::H, [QubitId(0)])).unwrap();
        dag.apply(Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(1)])).unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 2);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_parallel_gates_share_layer() {
        let mut dag = dag_with(3, 0);
        for i in 0..3 {
            dag.apply(Instruction::gate(StandardGate::H, [QubitId(i)])).unwrap();
        }

        let layers = dag.layers();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].len(), 3);
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut dag = dag_with(1, 0);
        let result = dag.apply(Instruction::gate(StandardGate::CX, [QubitId(0)]));
        assert!(matches!(
            result,
            Err(IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_qubit_not_found_with_context() {
        let mut dag = dag_with(1, 0);
        let err = dag
            .apply(Instruction::gate(StandardGate::X, [QubitId(5)]))
            .unwrap_err();
        assert!(err.to_string().contains("(gate: x)"));
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut dag = dag_with(1, 0);
        let result = dag.apply(Instruction::gate(StandardGate::CZ, [QubitId(0), QubitId(0)]));
        assert!(matches!(result, Err(IrError::DuplicateQubit { .. })));
    }

    #[test]
    fn test_unknown_clbit_rejected() {
        let mut dag = dag_with(1, 0);
        let result = dag.apply(Instruction::measure(QubitId(0), ClbitId(3)));
        assert!(matches!(result, Err(IrError::ClbitNotFound { .. })));
    }

    #[test]
    fn test_conditional_gate_follows_measurement() {
        let mut dag = dag_with(2, 1);

        let other = dag.apply(Instruction::gate(StandardGate::H, [QubitId(1)])).unwrap();
        let meas = dag.apply(Instruction::measure(QubitId(0), ClbitId(0))).unwrap();
        let gate = Gate::standard(StandardGate::X)
            .with_condition(ClassicalCondition::bit(ClbitId(0), true));
        let fix = dag
            .apply(Instruction::conditional_gate(gate, [QubitId(1)], [ClbitId(0)]))
            .unwrap();

        assert!(dag.depends_on(fix, meas));
        assert!(dag.depends_on(fix, other));
        assert!(!dag.depends_on(meas, fix));
        assert_eq!(dag.depth(), 2);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_topological_ops_keep_insertion_order() {
        let mut dag = dag_with(2, 0);
        dag.apply(Instruction::gate(StandardGate::X, [QubitId(1)])).unwrap();
        dag.apply(Instruction::gate(StandardGate::H, [QubitId(0)])).unwrap();

        let names: Vec<_> = dag.topological_ops().map(|(_, i)| i.name()).collect();
        assert_eq!(names, vec!["x", "h"]);
    }
}
