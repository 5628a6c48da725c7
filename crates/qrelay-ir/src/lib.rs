//! Circuits for qrelay's teleportation and tomography experiments.
//!
//! A [`Circuit`] is built through a fluent API and stored as a
//! [`CircuitDag`], where each qubit and classical bit is a wire. Mid-circuit
//! measurement and classically conditioned gates are first-class, and a
//! [`ClassicalLayout`] fixes where each classical bit lands in an outcome key.
//!
//! Noise enters either as an explicit [`NoiseChannel`] instruction or through
//! a backend's noise model keyed on [`Instruction::name`].
//!
//! # Example: Feed-forward correction
//!
//! ```rust
//! use qrelay_ir::{Circuit, StandardGate};
//!
//! let mut circuit = Circuit::new("ff");
//! let q = circuit.add_qreg("q", 2);
//! let m = circuit.add_creg("m", 1);
//!
//! circuit.h(q[0]).unwrap();
//! circuit.measure(q[0], m[0]).unwrap();
//! circuit.if_bit(StandardGate::X, q[1], m[0], true).unwrap();
//!
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I` | 1 | Identity (noise attachment point) |
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `SX` | 1 | sqrt(X) |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `CX`, `CZ` | 2 | Controlled-X and Controlled-Z |
//! | `Swap` | 2 | SWAP gate |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod layout;
pub mod noise;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, NodeIndex};
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, ConditionTarget, Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use layout::ClassicalLayout;
pub use noise::{Matrix2, NoiseChannel};
pub use qubit::{ClassicalRegister, Clbit, ClbitId, Qubit, QubitId, RegisterSlot};
