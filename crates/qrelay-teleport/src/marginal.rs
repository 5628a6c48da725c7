//! Marginalisation and post-selection of outcome counts.
//!
//! Backends report joint outcomes over every classical bit of a circuit.
//! Tomography only needs the single bit Bob's qubit was read into, so the
//! joint [`Counts`] are folded into a [`MarginalCounts`] before estimation.
//!
//! Positions refer to the whitespace-stripped outcome key. [`BitSelector`]
//! derives them from a circuit's [`ClassicalLayout`], which is the preferred
//! way to obtain them.

use std::fmt;

use qrelay_hal::Counts;
use qrelay_ir::{Circuit, ClassicalLayout, ClbitId};
use serde::{Deserialize, Serialize};

use crate::error::{TeleportError, TeleportResult};

/// The four Bell-measurement outcomes, as `a0 a1` patterns.
pub const BELL_OUTCOMES: [&str; 4] = ["00", "01", "10", "11"];

/// Counts of a single bit, keyed by `"0"` and `"1"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginalCounts {
    #[serde(rename = "0")]
    zeros: u64,
    #[serde(rename = "1")]
    ones: u64,
}

impl MarginalCounts {
    /// Create marginal counts from explicit totals.
    pub fn new(zeros: u64, ones: u64) -> Self {
        Self { zeros, ones }
    }

    /// Add `count` occurrences of `bit`.
    pub fn add(&mut self, bit: bool, count: u64) {
        if bit {
            self.ones += count;
        } else {
            self.zeros += count;
        }
    }

    /// Occurrences of `"0"`.
    pub fn zeros(&self) -> u64 {
        self.zeros
    }

    /// Occurrences of `"1"`.
    pub fn ones(&self) -> u64 {
        self.ones
    }

    /// Count for key `"0"` or `"1"`; any other key reads as zero.
    pub fn get(&self, key: &str) -> u64 {
        match key {
            "0" => self.zeros,
            "1" => self.ones,
            _ => 0,
        }
    }

    /// Sum of both entries.
    pub fn total(&self) -> u64 {
        self.zeros + self.ones
    }

    /// True when nothing was accumulated.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Convert back into a two-entry [`Counts`] map, omitting zero entries.
    pub fn to_counts(&self) -> Counts {
        [("0", self.zeros), ("1", self.ones)]
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}

impl fmt::Display for MarginalCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{0: {}, 1: {}}}", self.zeros, self.ones)
    }
}

/// Read the bit at `position` of a whitespace-stripped outcome key.
pub fn bit_at(outcome: &str, position: usize) -> TeleportResult<bool> {
    match outcome
        .chars()
        .filter(|c| !c.is_whitespace())
        .nth(position)
    {
        Some('0') => Ok(false),
        Some('1') => Ok(true),
        _ => Err(TeleportError::MalformedOutcome {
            outcome: outcome.to_string(),
            position,
        }),
    }
}

/// Parse a two-character post-selection pattern into `[aux0, aux1]`.
pub fn parse_pattern(pattern: &str) -> TeleportResult<[bool; 2]> {
    let bits: Vec<bool> = pattern
        .chars()
        .map(|c| match c {
            '0' => Some(false),
            '1' => Some(true),
            _ => None,
        })
        .collect::<Option<_>>()
        .ok_or_else(|| TeleportError::InvalidPattern(pattern.to_string()))?;

    match bits.as_slice() {
        [a, b] => Ok([*a, *b]),
        _ => Err(TeleportError::InvalidPattern(pattern.to_string())),
    }
}

/// Sum `counts` by the value of the bit at `position`.
pub fn marginalize(counts: &Counts, position: usize) -> TeleportResult<MarginalCounts> {
    if counts.is_empty() {
        return Err(TeleportError::EmptyCountSet);
    }

    let mut reduced = MarginalCounts::default();
    for (outcome, &n) in counts.iter() {
        reduced.add(bit_at(outcome, position)?, n);
    }
    Ok(reduced)
}

/// Sum `counts` by the bit at `target`, keeping only outcomes whose bits at
/// `aux[0]` and `aux[1]` equal the two characters of `pattern`.
///
/// A pattern that never occurs yields empty marginal counts, not an error.
pub fn postselect(
    counts: &Counts,
    target: usize,
    aux: [usize; 2],
    pattern: &str,
) -> TeleportResult<MarginalCounts> {
    let wanted = parse_pattern(pattern)?;
    if counts.is_empty() {
        return Err(TeleportError::EmptyCountSet);
    }

    let mut selected = MarginalCounts::default();
    for (outcome, &n) in counts.iter() {
        let target_bit = bit_at(outcome, target)?;
        let observed = [bit_at(outcome, aux[0])?, bit_at(outcome, aux[1])?];
        if observed == wanted {
            selected.add(target_bit, n);
        }
    }
    Ok(selected)
}

/// Resolves classical bits of a circuit to outcome-key positions.
#[derive(Debug, Clone)]
pub struct BitSelector {
    layout: ClassicalLayout,
}

impl BitSelector {
    /// Build a selector from the circuit whose counts will be inspected.
    pub fn new(circuit: &Circuit) -> Self {
        Self {
            layout: circuit.classical_layout(),
        }
    }

    /// Build a selector from an existing layout.
    pub fn from_layout(layout: ClassicalLayout) -> Self {
        Self { layout }
    }

    /// Position of `clbit` in a whitespace-stripped outcome key.
    pub fn position(&self, clbit: ClbitId) -> TeleportResult<usize> {
        self.layout
            .position_of(clbit)
            .ok_or(TeleportError::UnknownClbit(clbit.0))
    }

    /// Marginalise `counts` onto `clbit`.
    pub fn marginalize(&self, counts: &Counts, clbit: ClbitId) -> TeleportResult<MarginalCounts> {
        marginalize(counts, self.position(clbit)?)
    }

    /// Marginalise onto `target`, post-selecting `aux` on `pattern`.
    pub fn postselect(
        &self,
        counts: &Counts,
        target: ClbitId,
        aux: [ClbitId; 2],
        pattern: &str,
    ) -> TeleportResult<MarginalCounts> {
        postselect(
            counts,
            self.position(target)?,
            [self.position(aux[0])?, self.position(aux[1])?],
            pattern,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teleport_counts() -> Counts {
        // keys are "a1 a0 bob"
        [("0 0 0", 10), ("0 0 1", 5), ("0 1 0", 7), ("1 0 1", 3)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_marginalize_strips_whitespace() {
        let m = marginalize(&teleport_counts(), 2).unwrap();
        assert_eq!(m.zeros(), 17);
        assert_eq!(m.ones(), 8);
        assert_eq!(m.total(), 25);
    }

    #[test]
    fn test_marginalize_short_outcome_is_malformed() {
        let counts: Counts = [("01", 4)].into_iter().collect();
        let err = marginalize(&counts, 2).unwrap_err();
        assert!(matches!(
            err,
            TeleportError::MalformedOutcome { position: 2, .. }
        ));
    }

    #[test]
    fn test_marginalize_rejects_non_binary() {
        let counts: Counts = [("0x1", 4)].into_iter().collect();
        assert!(marginalize(&counts, 1).is_err());
    }

    #[test]
    fn test_marginalize_empty() {
        assert!(matches!(
            marginalize(&Counts::new(), 0),
            Err(TeleportError::EmptyCountSet)
        ));
    }

    #[test]
    fn test_postselect_pattern_order() {
        // a0 sits at position 1, a1 at position 0
        let counts = teleport_counts();
        let sel = postselect(&counts, 2, [1, 0], "10").unwrap();
        assert_eq!(sel, MarginalCounts::new(7, 0));

        let sel = postselect(&counts, 2, [1, 0], "01").unwrap();
        assert_eq!(sel, MarginalCounts::new(0, 3));
    }

    #[test]
    fn test_postselect_never_matching_is_empty() {
        let counts: Counts = [("0 0 1", 9)].into_iter().collect();
        let sel = postselect(&counts, 2, [1, 0], "11").unwrap();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_parse_pattern() {
        assert_eq!(parse_pattern("01").unwrap(), [false, true]);
        for bad in ["", "0", "012", "0a", "2 "] {
            assert!(matches!(
                parse_pattern(bad),
                Err(TeleportError::InvalidPattern(_))
            ));
        }
    }

    #[test]
    fn test_to_counts_omits_zero() {
        let counts = MarginalCounts::new(3, 0).to_counts();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("0"), 3);
    }

    #[test]
    fn test_serializes_as_bit_map() {
        let json = serde_json::to_string(&MarginalCounts::new(2, 1)).unwrap();
        assert_eq!(json, r#"{"0":2,"1":1}"#);
    }
}
