//! qrelay Local Noisy Simulator
//!
//! This crate provides the local backend the teleportation experiments run
//! on. It simulates each shot as a separate statevector trajectory, which
//! makes mid-circuit measurement, classical feed-forward and non-unital
//! noise exact in distribution.
//!
//! # Features
//!
//! - **Dynamic circuits**: mid-circuit measurement, reset, conditional gates
//! - **Instruction-keyed noise**: [`NoiseModel::add_all_qubit_error`]
//! - **Kraus sampling**: branch `i` is chosen with probability `‖K_i ψ‖²`
//! - **Reproducible**: seeded through [`SimulatorConfig::seed`]
//!
//! # Example
//!
//! ```ignore
//! use qrelay_adapter_sim::{NoiseModel, SimulatorBackend, SimulatorConfig};
//! use qrelay_hal::Backend;
//! use qrelay_ir::{Circuit, NoiseChannel};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut noise = NoiseModel::new();
//!     noise.add_all_qubit_error(NoiseChannel::depolarizing(0.05)?, &["id"])?;
//!
//!     let backend = SimulatorBackend::with_config(
//!         SimulatorConfig::default().with_seed(42).with_noise_model(noise),
//!     );
//!
//!     let result = backend.run(&Circuit::bell()?, 1000).await?;
//!     println!("Results: {:?}", result.counts);
//!     Ok(())
//! }
//! ```

mod noise;
mod simulator;
mod statevector;

pub use noise::NoiseModel;
pub use simulator::{MAX_SIMULATED_QUBITS, SimulatorBackend, SimulatorConfig};
