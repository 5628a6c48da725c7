//! Property tests for outcome layouts and DAG construction.

use proptest::prelude::*;
use qrelay_ir::{Circuit, QubitId, StandardGate};

proptest! {
    /// Every classical bit gets a distinct position and the formatted key
    /// carries its value at that position once spaces are removed.
    #[test]
    fn positions_match_formatted_keys(
        sizes in prop::collection::vec(1u32..4, 1..5),
        seed in any::<u64>(),
    ) {
        let mut circuit = Circuit::new("layout");
        let mut bits = vec![];
        for (i, size) in sizes.iter().enumerate() {
            bits.extend(circuit.add_creg(format!("r{i}"), *size));
        }

        let values: Vec<bool> = (0..bits.len()).map(|i| (seed >> (i % 64)) & 1 == 1).collect();
        let layout = circuit.classical_layout();
        let key = layout.format_outcome(&values);
        let stripped: Vec<char> = key.chars().filter(|c| !c.is_whitespace()).collect();

        prop_assert_eq!(stripped.len(), bits.len());
        prop_assert_eq!(key.split(' ').count(), sizes.len());
        for bit in bits {
            let pos = layout.position_of(bit).unwrap();
            let expected = if values[bit.0 as usize] { '1' } else { '0' };
            prop_assert_eq!(stripped[pos], expected);
        }
    }

    /// Depth never exceeds the number of operations and layers cover them all.
    #[test]
    fn layers_cover_all_ops(ops in prop::collection::vec((0u32..3, 0u32..3), 0..40)) {
        let mut circuit = Circuit::with_size("random", 3, 0);
        for (a, b) in ops {
            if a == b {
                circuit.gate(StandardGate::H, [QubitId(a)]).unwrap();
            } else {
                circuit.cx(QubitId(a), QubitId(b)).unwrap();
            }
        }

        let dag = circuit.dag();
        prop_assert!(dag.depth() <= dag.num_ops());
        let total: usize = dag.layers().iter().map(Vec::len).sum();
        prop_assert_eq!(total, dag.num_ops());
        prop_assert!(dag.verify_integrity().is_ok());
    }
}
