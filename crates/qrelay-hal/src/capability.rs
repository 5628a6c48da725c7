//! What a backend can run.

use serde::{Deserialize, Serialize};

/// Limits and features a backend advertises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub name: String,
    pub num_qubits: u32,
    pub gate_set: GateSet,
    pub max_shots: u32,
    pub is_simulator: bool,
    /// Flags such as `"mid_circuit_measurement"` or `"noise_model"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_profile: Option<NoiseProfile>,
}

impl Capabilities {
    /// A simulator with `num_qubits` qubits and every IR gate.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::all_ir_gates(),
            max_shots: 100_000,
            is_simulator: true,
            features: vec![
                "statevector".into(),
                "dynamic_circuits".into(),
                "mid_circuit_measurement".into(),
            ],
            noise_profile: None,
        }
    }

    /// Attach a noise profile and set the `noise_model` flag.
    #[must_use]
    pub fn with_noise_profile(mut self, profile: NoiseProfile) -> Self {
        self.noise_profile = Some(profile);
        if !self.has_feature("noise_model") {
            self.features.push("noise_model".into());
        }
        self
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Gate names a backend accepts, lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSet {
    pub single_qubit: Vec<String>,
    pub two_qubit: Vec<String>,
}

impl GateSet {
    /// Every gate [`qrelay_ir::StandardGate`] can express.
    pub fn all_ir_gates() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| (*s).to_string()).collect();
        Self {
            single_qubit: names(&[
                "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "sx", "rx", "ry", "rz", "p",
            ]),
            two_qubit: names(&["cx", "cz", "swap"]),
        }
    }

    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().chain(&self.two_qubit).any(|g| g == gate)
    }
}

/// Coherence times of the modelled noise, in the unit of the circuit's
/// delays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseProfile {
    /// `None` when relaxation is not modelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t2: Option<f64>,
}
