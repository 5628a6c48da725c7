//! Classical outcome layout.
//!
//! Backends report each shot as a string of register groups. Registers are
//! written in reverse declaration order, separated by single spaces, and
//! inside a register the highest-index bit comes first. A circuit with
//! registers `c_bob[1]`, `c_a0[1]`, `c_a1[1]` (declared in that order)
//! therefore produces keys like `"1 0 1"` meaning `c_a1=1 c_a0=0 c_bob=1`.
//!
//! [`ClassicalLayout`] captures that grouping so that consumers can find a
//! bit in an outcome string without hard-coding character indices.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::qubit::{ClassicalRegister, ClbitId};

/// Register grouping of a circuit's classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalLayout {
    /// Groups in declaration order, each lowest index first.
    groups: Vec<Vec<ClbitId>>,
    /// Character position of each bit in the whitespace-stripped key.
    positions: FxHashMap<ClbitId, usize>,
}

impl ClassicalLayout {
    /// Build the layout from registers in declaration order.
    ///
    /// Bits that belong to no register form an implicit group declared
    /// before all registers, so they appear rightmost in the key.
    pub fn new(registers: &[ClassicalRegister], loose: &[ClbitId]) -> Self {
        let mut groups = vec![];
        if !loose.is_empty() {
            groups.push(loose.to_vec());
        }
        groups.extend(
            registers
                .iter()
                .filter(|r| !r.is_empty())
                .map(|r| r.bits.clone()),
        );

        let positions = groups
            .iter()
            .rev()
            .flat_map(|g| g.iter().rev())
            .enumerate()
            .map(|(pos, &bit)| (bit, pos))
            .collect();

        Self { groups, positions }
    }

    /// Total number of classical bits in the layout.
    pub fn num_bits(&self) -> usize {
        self.positions.len()
    }

    /// Character position of `clbit` in a whitespace-stripped outcome key.
    pub fn position_of(&self, clbit: ClbitId) -> Option<usize> {
        self.positions.get(&clbit).copied()
    }

    /// Format the classical bit values of one shot as an outcome key.
    ///
    /// `bits` is indexed by `ClbitId`; missing entries read as 0.
    pub fn format_outcome(&self, bits: &[bool]) -> String {
        let mut out = String::with_capacity(self.num_bits() + self.groups.len());
        for (i, group) in self.groups.iter().rev().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            for bit in group.iter().rev() {
                let set = bits.get(bit.0 as usize).copied().unwrap_or(false);
                out.push(if set { '1' } else { '0' });
            }
        }
        out
    }
}
