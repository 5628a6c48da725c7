//! Single-qubit noise channel descriptors.
//!
//! A [`NoiseChannel`] describes a physical noise process and knows its own
//! Kraus decomposition. Channels appear in two places: as explicit
//! [`crate::InstructionKind::NoiseChannel`] instructions in a circuit, and as
//! errors a simulator attaches to named instructions (e.g. every `id` or
//! every `delay`).
//!
//! Parameter conventions follow the usual textbook definitions:
//!
//! | Channel | Map |
//! |---------|-----|
//! | `Depolarizing { p }` | ρ → (1−p)ρ + p·I/2, `p ∈ [0, 4/3]` |
//! | `AmplitudeDamping { gamma }` | \|1⟩ decays to \|0⟩ with probability γ |
//! | `PhaseDamping { gamma }` | off-diagonals scaled by √(1−γ) |
//! | `BitFlip { p }` / `PhaseFlip { p }` | X / Z with probability p |
//! | `ThermalRelaxation { t1, t2, time }` | T1 decay and T2 dephasing over `time` |

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// A 2×2 complex matrix, row-major.
pub type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A single-qubit noise channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum NoiseChannel {
    /// Depolarizing channel: with probability `p`, replaces the state
    /// with the maximally mixed state.
    Depolarizing {
        /// Depolarizing parameter (0.0 to 4/3).
        p: f64,
    },

    /// Amplitude damping: energy relaxation towards |0⟩.
    AmplitudeDamping {
        /// Damping parameter (0.0 to 1.0).
        gamma: f64,
    },

    /// Phase damping: dephasing without energy loss.
    PhaseDamping {
        /// Dephasing parameter (0.0 to 1.0).
        gamma: f64,
    },

    /// Bit-flip channel: applies X with probability `p`.
    BitFlip {
        /// Flip probability (0.0 to 1.0).
        p: f64,
    },

    /// Phase-flip channel: applies Z with probability `p`.
    PhaseFlip {
        /// Flip probability (0.0 to 1.0).
        p: f64,
    },

    /// Thermal relaxation over a fixed duration.
    ///
    /// `t1` may be `f64::INFINITY` for pure dephasing.
    ThermalRelaxation {
        /// Energy relaxation time.
        t1: f64,
        /// Dephasing time, at most `2 * t1`.
        t2: f64,
        /// Duration the qubit idles, in the same unit as `t1`/`t2`.
        time: f64,
    },
}

impl NoiseChannel {
    /// Depolarizing channel, validated.
    pub fn depolarizing(p: f64) -> IrResult<Self> {
        Self::Depolarizing { p }.validated()
    }

    /// Amplitude damping channel, validated.
    pub fn amplitude_damping(gamma: f64) -> IrResult<Self> {
        Self::AmplitudeDamping { gamma }.validated()
    }

    /// Phase damping channel, validated.
    pub fn phase_damping(gamma: f64) -> IrResult<Self> {
        Self::PhaseDamping { gamma }.validated()
    }

    /// Thermal relaxation channel, validated.
    pub fn thermal_relaxation(t1: f64, t2: f64, time: f64) -> IrResult<Self> {
        Self::ThermalRelaxation { t1, t2, time }.validated()
    }

    /// Get a human-readable name for this channel.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseChannel::Depolarizing { .. } => "depolarizing",
            NoiseChannel::AmplitudeDamping { .. } => "amplitude_damping",
            NoiseChannel::PhaseDamping { .. } => "phase_damping",
            NoiseChannel::BitFlip { .. } => "bit_flip",
            NoiseChannel::PhaseFlip { .. } => "phase_flip",
            NoiseChannel::ThermalRelaxation { .. } => "thermal_relaxation",
        }
    }

    /// Check the parameters and return the channel unchanged if they are physical.
    pub fn validated(self) -> IrResult<Self> {
        let invalid = |reason: String| IrError::InvalidNoise {
            channel: self.name().to_string(),
            reason,
        };
        let unit = |v: f64, what: &str| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(invalid(format!("{what} must be in [0, 1], got {v}")))
            }
        };

        match &self {
            NoiseChannel::Depolarizing { p } => {
                if !(0.0..=4.0 / 3.0).contains(p) {
                    return Err(invalid(format!("p must be in [0, 4/3], got {p}")));
                }
            }
            NoiseChannel::AmplitudeDamping { gamma } | NoiseChannel::PhaseDamping { gamma } => {
                unit(*gamma, "gamma")?;
            }
            NoiseChannel::BitFlip { p } | NoiseChannel::PhaseFlip { p } => unit(*p, "p")?,
            NoiseChannel::ThermalRelaxation { t1, t2, time } => {
                if !(*t1 > 0.0) || !(*t2 > 0.0) {
                    return Err(invalid(format!("t1 and t2 must be positive, got {t1}, {t2}")));
                }
                if *t2 > 2.0 * t1 {
                    return Err(invalid(format!("t2 ({t2}) must not exceed 2*t1 ({t1})")));
                }
                if !(*time >= 0.0) {
                    return Err(invalid(format!("time must be non-negative, got {time}")));
                }
            }
        }
        Ok(self)
    }

    /// Kraus operators `{K_i}` with `Σ K_i† K_i = I`.
    ///
    /// Operators with zero weight are omitted.
    pub fn kraus_operators(&self) -> Vec<Matrix2> {
        let scaled = |m: Matrix2, s: f64| -> Matrix2 {
            [[m[0][0] * s, m[0][1] * s], [m[1][0] * s, m[1][1] * s]]
        };

        let ops = match self {
            NoiseChannel::Depolarizing { p } => {
                let keep = (1.0 - 3.0 * p / 4.0).max(0.0).sqrt();
                let flip = (p / 4.0).sqrt();
                vec![
                    scaled(identity(), keep),
                    scaled(pauli_x(), flip),
                    scaled(pauli_y(), flip),
                    scaled(pauli_z(), flip),
                ]
            }
            NoiseChannel::AmplitudeDamping { gamma } => amplitude_damping_kraus(*gamma),
            NoiseChannel::PhaseDamping { gamma } => phase_damping_kraus(*gamma),
            NoiseChannel::BitFlip { p } => {
                vec![scaled(identity(), (1.0 - p).sqrt()), scaled(pauli_x(), p.sqrt())]
            }
            NoiseChannel::PhaseFlip { p } => {
                vec![scaled(identity(), (1.0 - p).sqrt()), scaled(pauli_z(), p.sqrt())]
            }
            NoiseChannel::ThermalRelaxation { t1, t2, time } => {
                let gamma1 = if t1.is_infinite() {
                    0.0
                } else {
                    1.0 - (-time / t1).exp()
                };
                // Dephasing left over after the T1 contribution to coherence decay.
                let rate = 1.0 / t2 - if t1.is_infinite() { 0.0 } else { 0.5 / t1 };
                let gamma2 = (1.0 - (-2.0 * time * rate).exp()).clamp(0.0, 1.0);

                let mut ops = vec![];
                for pd in phase_damping_kraus(gamma2) {
                    for ad in amplitude_damping_kraus(gamma1) {
                        ops.push(matmul(&pd, &ad));
                    }
                }
                ops
            }
        };

        ops.into_iter()
            .filter(|k| k.iter().flatten().any(|c| c.norm_sqr() > 0.0))
            .collect()
    }
}

impl std::fmt::Display for NoiseChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoiseChannel::Depolarizing { p } => write!(f, "depolarizing(p={p:.4})"),
            NoiseChannel::AmplitudeDamping { gamma } => {
                write!(f, "amplitude_damping(γ={gamma:.4})")
            }
            NoiseChannel::PhaseDamping { gamma } => write!(f, "phase_damping(γ={gamma:.4})"),
            NoiseChannel::BitFlip { p } => write!(f, "bit_flip(p={p:.4})"),
            NoiseChannel::PhaseFlip { p } => write!(f, "phase_flip(p={p:.4})"),
            NoiseChannel::ThermalRelaxation { t1, t2, time } => {
                write!(f, "thermal_relaxation(t1={t1}, t2={t2}, t={time})")
            }
        }
    }
}

fn identity() -> Matrix2 {
    [[ONE, ZERO], [ZERO, ONE]]
}

fn pauli_x() -> Matrix2 {
    [[ZERO, ONE], [ONE, ZERO]]
}

fn pauli_y() -> Matrix2 {
    [[ZERO, Complex64::new(0.0, -1.0)], [Complex64::new(0.0, 1.0), ZERO]]
}

fn pauli_z() -> Matrix2 {
    [[ONE, ZERO], [ZERO, -ONE]]
}

fn amplitude_damping_kraus(gamma: f64) -> Vec<Matrix2> {
    let keep = Complex64::new((1.0 - gamma).sqrt(), 0.0);
    let decay = Complex64::new(gamma.sqrt(), 0.0);
    vec![[[ONE, ZERO], [ZERO, keep]], [[ZERO, decay], [ZERO, ZERO]]]
}

fn phase_damping_kraus(gamma: f64) -> Vec<Matrix2> {
    let keep = Complex64::new((1.0 - gamma).sqrt(), 0.0);
    let dephase = Complex64::new(gamma.sqrt(), 0.0);
    vec![[[ONE, ZERO], [ZERO, keep]], [[ZERO, ZERO], [ZERO, dephase]]]
}

fn matmul(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    let mut out = [[ZERO; 2]; 2];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j];
        }
    }
    out
}
