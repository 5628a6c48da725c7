//! Instruction-keyed noise model.
//!
//! A [`NoiseModel`] maps instruction names (`"id"`, `"delay"`, `"cx"`, ...)
//! to noise channels. After the simulator executes an instruction whose name
//! has errors attached, each channel is applied to every qubit the
//! instruction touched, in the order the errors were added.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use qrelay_hal::NoiseProfile;
use qrelay_ir::{IrResult, Matrix2, NoiseChannel};

/// Noise attached to instructions by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Channels per instruction name, in insertion order.
    errors: FxHashMap<String, Vec<NoiseChannel>>,
}

impl NoiseModel {
    /// Create an empty (ideal) noise model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `channel` to every qubit of every instruction named in
    /// `instructions`.
    ///
    /// The channel parameters are validated first.
    pub fn add_all_qubit_error(
        &mut self,
        channel: NoiseChannel,
        instructions: &[&str],
    ) -> IrResult<&mut Self> {
        let channel = channel.validated()?;
        for name in instructions {
            self.errors
                .entry((*name).to_string())
                .or_default()
                .push(channel.clone());
        }
        Ok(self)
    }

    /// Channels attached to an instruction name.
    pub fn errors_for(&self, instruction: &str) -> &[NoiseChannel] {
        self.errors.get(instruction).map_or(&[], Vec::as_slice)
    }

    /// Whether no errors are attached at all.
    pub fn is_ideal(&self) -> bool {
        self.errors.values().all(Vec::is_empty)
    }

    /// Instruction names with attached errors, sorted.
    pub fn noisy_instructions(&self) -> Vec<&str> {
        let mut names: Vec<_> = self
            .errors
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, _)| k.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Precompute Kraus operators for every attached channel.
    pub(crate) fn compile(&self) -> FxHashMap<String, Vec<Vec<Matrix2>>> {
        self.errors
            .iter()
            .map(|(name, chans)| {
                (
                    name.clone(),
                    chans.iter().map(NoiseChannel::kraus_operators).collect(),
                )
            })
            .collect()
    }

    /// Summarise relaxation times for capability reporting.
    ///
    /// Uses the first thermal relaxation channel found, if any.
    pub fn profile(&self) -> Option<NoiseProfile> {
        if self.is_ideal() {
            return None;
        }
        let thermal = self
            .noisy_instructions()
            .into_iter()
            .flat_map(|name| self.errors_for(name))
            .find_map(|c| match c {
                NoiseChannel::ThermalRelaxation { t1, t2, .. } => Some((*t1, *t2)),
                _ => None,
            });

        Some(NoiseProfile {
            t1: thermal.map(|(t1, _)| t1).filter(|t1| t1.is_finite()),
            t2: thermal.map(|(_, t2)| t2),
        })
    }
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ideal() {
            return write!(f, "NoiseModel(ideal)");
        }
        write!(f, "NoiseModel(")?;
        for (i, name) in self.noisy_instructions().into_iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            let chans: Vec<String> =
                self.errors_for(name).iter().map(ToString::to_string).collect();
            write!(f, "{name}: {}", chans.join(", "))?;
        }
        write!(f, ")")
    }
}
