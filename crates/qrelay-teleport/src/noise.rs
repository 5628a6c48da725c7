//! Noise scenarios for teleportation.
//!
//! Two kinds of degradation are studied:
//!
//! - **Feed-forward delay**: Bob's qubit idles while the classical bits
//!   travel, dephasing with time constant T2.
//! - **Bell-pair noise**: each half of the shared pair passes through an
//!   identity gate carrying a depolarizing or amplitude-damping error.

use std::fmt;
use std::str::FromStr;

use qrelay_adapter_sim::NoiseModel;
use qrelay_ir::{Circuit, NoiseChannel, QubitId};
use serde::{Deserialize, Serialize};

use crate::error::{TeleportError, TeleportResult};

/// Instruction name the delay error is attached to.
pub const DELAY_INSTRUCTION: &str = "delay";

/// Instruction name Bell-pair errors are attached to.
pub const IDENTITY_INSTRUCTION: &str = "id";

/// Idle Bob's qubit for `delay` and return a model that dephases it.
///
/// For `delay > 0` a delay on `bob` and a barrier are appended to
/// `circuit`. The returned model attaches thermal relaxation with infinite
/// T1 and the given T2 to every `delay` instruction. With `delay == 0` the
/// circuit is unchanged and the model has no effect.
pub fn add_delay_with_dephasing(
    circuit: &mut Circuit,
    bob: QubitId,
    delay: f64,
    t2: f64,
) -> TeleportResult<NoiseModel> {
    if delay > 0.0 {
        circuit.delay(bob, delay)?.barrier_all()?;
    }

    let dephase = NoiseChannel::thermal_relaxation(f64::INFINITY, t2, delay)?;
    let mut model = NoiseModel::new();
    model.add_all_qubit_error(dephase, &[DELAY_INSTRUCTION])?;
    Ok(model)
}

/// Depolarizing error of strength `p` on every identity gate.
pub fn bellpair_depolarizing_noise(p: f64) -> TeleportResult<NoiseModel> {
    let mut model = NoiseModel::new();
    model.add_all_qubit_error(NoiseChannel::depolarizing(p)?, &[IDENTITY_INSTRUCTION])?;
    Ok(model)
}

/// Amplitude damping of strength `p` on every identity gate.
pub fn bellpair_amplitude_damping_noise(p: f64) -> TeleportResult<NoiseModel> {
    let mut model = NoiseModel::new();
    model.add_all_qubit_error(
        NoiseChannel::amplitude_damping(p)?,
        &[IDENTITY_INSTRUCTION],
    )?;
    Ok(model)
}

/// Noise applied to the Bell pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BellPairNoise {
    /// Depolarizing channel.
    Depolarizing,
    /// Amplitude damping channel.
    AmplitudeDamping,
}

impl BellPairNoise {
    /// Every kind, in plotting order.
    pub const ALL: [BellPairNoise; 2] =
        [BellPairNoise::Depolarizing, BellPairNoise::AmplitudeDamping];

    /// Noise model for strength `p`.
    pub fn noise_model(self, p: f64) -> TeleportResult<NoiseModel> {
        match self {
            BellPairNoise::Depolarizing => bellpair_depolarizing_noise(p),
            BellPairNoise::AmplitudeDamping => bellpair_amplitude_damping_noise(p),
        }
    }

    /// Machine-friendly identifier (`depolarizing`, `amplitude_damping`).
    pub fn key(self) -> &'static str {
        match self {
            BellPairNoise::Depolarizing => "depolarizing",
            BellPairNoise::AmplitudeDamping => "amplitude_damping",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            BellPairNoise::Depolarizing => "Depolarizing",
            BellPairNoise::AmplitudeDamping => "Amplitude Damping",
        }
    }
}

impl fmt::Display for BellPairNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BellPairNoise {
    type Err = TeleportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "depolarizing" | "depol" => Ok(BellPairNoise::Depolarizing),
            "amplitude_damping" | "ad" => Ok(BellPairNoise::AmplitudeDamping),
            other => Err(TeleportError::Config(format!(
                "unknown Bell-pair noise '{other}', expected depolarizing or amplitude_damping"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teleport::build_teleportation_circuit;

    #[test]
    fn test_delay_appended_only_when_positive() {
        let mut tc = build_teleportation_circuit(0.5, 1.0, None).unwrap();
        let before = tc.circuit.dag().num_ops();

        let model = add_delay_with_dephasing(&mut tc.circuit, tc.bob_qubit, 0.0, 150.0).unwrap();
        assert_eq!(tc.circuit.dag().num_ops(), before);
        assert_eq!(model.errors_for(DELAY_INSTRUCTION).len(), 1);

        add_delay_with_dephasing(&mut tc.circuit, tc.bob_qubit, 100.0, 150.0).unwrap();
        assert_eq!(tc.circuit.dag().num_ops(), before + 2);
    }

    #[test]
    fn test_delay_rejects_bad_t2() {
        let mut tc = build_teleportation_circuit(0.5, 1.0, None).unwrap();
        let err = add_delay_with_dephasing(&mut tc.circuit, tc.bob_qubit, 10.0, -1.0);
        assert!(matches!(err, Err(TeleportError::Ir(_))));
    }

    #[test]
    fn test_bellpair_models_target_identity() {
        for kind in BellPairNoise::ALL {
            let model = kind.noise_model(0.25).unwrap();
            assert_eq!(model.noisy_instructions(), vec![IDENTITY_INSTRUCTION]);
        }
        assert!(bellpair_amplitude_damping_noise(1.5).is_err());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(
            "Amplitude Damping".parse::<BellPairNoise>().unwrap(),
            BellPairNoise::AmplitudeDamping
        );
        assert_eq!(
            "depolarizing".parse::<BellPairNoise>().unwrap(),
            BellPairNoise::Depolarizing
        );
        assert!("thermal".parse::<BellPairNoise>().is_err());
    }
}
