//! Wire identifiers, wires and classical registers.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! wire_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

wire_id!(
    /// Qubit index within its circuit, shown as `q<n>`.
    QubitId,
    "q"
);
wire_id!(
    /// Classical bit index within its circuit, shown as `c<n>`.
    ClbitId,
    "c"
);

/// Position of a wire inside a named register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterSlot {
    pub name: String,
    pub index: u32,
}

impl fmt::Display for RegisterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.index)
    }
}

fn slot(register: impl Into<String>, index: u32) -> Option<RegisterSlot> {
    Some(RegisterSlot {
        name: register.into(),
        index,
    })
}

/// A qubit wire. Displays as `name[i]` inside a register, `q<n>` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    pub id: QubitId,
    pub register: Option<RegisterSlot>,
}

impl Qubit {
    pub fn new(id: QubitId) -> Self {
        Self { id, register: None }
    }

    pub fn with_register(id: QubitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: slot(register, index),
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.register {
            Some(slot) => fmt::Display::fmt(slot, f),
            None => fmt::Display::fmt(&self.id, f),
        }
    }
}

/// A classical wire, displayed like [`Qubit`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clbit {
    pub id: ClbitId,
    pub register: Option<RegisterSlot>,
}

impl Clbit {
    pub fn new(id: ClbitId) -> Self {
        Self { id, register: None }
    }

    pub fn with_register(id: ClbitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: slot(register, index),
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.register {
            Some(slot) => fmt::Display::fmt(slot, f),
            None => fmt::Display::fmt(&self.id, f),
        }
    }
}

/// A named group of classical bits; `bits[i]` is `name[i]`.
///
/// Conditions on a register read it as an integer with `bits[0]` least
/// significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalRegister {
    pub name: String,
    pub bits: Vec<ClbitId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_wires_display_by_id() {
        assert_eq!(Qubit::new(QubitId(0)).to_string(), "q0");
        assert_eq!(Clbit::new(ClbitId(1)).to_string(), "c1");
    }

    #[test]
    fn test_register_wires_display_by_slot() {
        assert_eq!(Qubit::with_register(QubitId(2), "bob", 0).to_string(), "bob[0]");
        assert_eq!(Clbit::with_register(ClbitId(1), "c_a0", 0).to_string(), "c_a0[0]");
    }

    #[test]
    fn test_ids_order_by_index() {
        assert!(QubitId(1) < QubitId(2));
        assert_eq!(ClbitId::from(4), ClbitId(4));
    }
}
