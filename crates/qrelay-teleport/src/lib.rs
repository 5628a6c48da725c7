//! qrelay Teleportation & Tomography
//!
//! This crate builds quantum teleportation circuits, runs them on a
//! [`qrelay_hal::Backend`], and reconstructs the teleported state by
//! single-qubit tomography.
//!
//! # Overview
//!
//! ```text
//! prepare |ψ⟩ ─► Bell pair ─► Bell measurement ─► feed-forward ─► measure X/Y/Z
//!                                                                    │
//!                        marginalise / post-select ◄─────────────────┘
//!                                    │
//!                        ⟨X⟩, ⟨Y⟩, ⟨Z⟩ ─► clamp Bloch vector ─► ρ
//! ```
//!
//! - **Circuits**: [`build_teleportation_circuit`], [`apply_feedforward`]
//! - **Tomography**: [`tomography_after_feedforward`], [`tomography_postselected`]
//! - **Estimation**: [`marginalize`], [`postselect`], [`expectation`], [`reconstruct_density`]
//! - **Noise**: feed-forward delay dephasing and [`BellPairNoise`]
//! - **Sweeps**: fidelity against delay or noise strength
//! - **Rendering**: SVG circuit diagrams, Bloch spheres, histograms and plots
//!
//! # Example
//!
//! ```ignore
//! use qrelay_adapter_sim::{SimulatorBackend, SimulatorConfig};
//! use qrelay_teleport::{build_teleportation_circuit, ideal_state, tomography_after_feedforward};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let tc = build_teleportation_circuit(0.5, 1.0, None)?.with_feedforward()?;
//!     let backend = SimulatorBackend::with_config(SimulatorConfig::default().with_seed(7));
//!
//!     let result = tomography_after_feedforward(&tc, &backend, 1000).await?;
//!     println!("{}", result.density);
//!     println!("fidelity = {:.4}", result.density.fidelity_with_pure(&ideal_state(0.5, 1.0)));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod density;
pub mod error;
pub mod marginal;
pub mod noise;
pub mod render;
pub mod sweep;
pub mod teleport;
pub mod tomography;

pub use config::ExperimentConfig;
pub use density::{BlochVector, DensityMatrix, SingleQubitState, reconstruct_density};
pub use error::{TeleportError, TeleportResult};
pub use marginal::{BELL_OUTCOMES, BitSelector, MarginalCounts, marginalize, postselect};
pub use noise::{
    BellPairNoise, add_delay_with_dephasing, bellpair_amplitude_damping_noise,
    bellpair_depolarizing_noise,
};
pub use sweep::{SweepPoint, SweepSeries, bellpair_noise_sweep, dephasing_sweep, linspace};
pub use teleport::{
    TeleportationCircuit, apply_feedforward, build_teleportation_circuit, degrade_bell_pair,
    generate_bell_pair, ideal_state, prepare_state,
};
pub use tomography::{
    BasisCounts, ExpectationTriple, MeasurementBasis, TomographyResult, expectation,
    measure_in_basis, tomography_after_feedforward, tomography_postselected,
};
