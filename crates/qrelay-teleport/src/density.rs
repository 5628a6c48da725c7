//! Single-qubit states, Bloch vectors and density matrices.
//!
//! A qubit density matrix is fully described by its Bloch vector `r`:
//!
//! ```text
//! ρ = ½ (I + rx·X + ry·Y + rz·Z) = ½ [[1 + rz, rx − i·ry],
//!                                     [rx + i·ry, 1 − rz]]
//! ```
//!
//! Physical states satisfy `|r| ≤ 1`. Estimates from finite shot counts can
//! land slightly outside the ball; [`BlochVector::clamped`] maps them back
//! onto the surface.

use std::fmt;

use ndarray::{Array2, array};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing norms against the unit sphere.
const NORM_EPS: f64 = 1e-12;

/// A point in the Bloch ball.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlochVector {
    /// X component, `⟨X⟩`.
    pub x: f64,
    /// Y component, `⟨Y⟩`.
    pub y: f64,
    /// Z component, `⟨Z⟩`.
    pub z: f64,
}

impl BlochVector {
    /// Create a Bloch vector without clamping.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// True if the vector lies in the closed unit ball.
    pub fn is_physical(&self) -> bool {
        self.norm() <= 1.0 + NORM_EPS
    }

    /// Rescale onto the unit sphere if the norm exceeds 1.
    ///
    /// Vectors at or inside the sphere are returned unchanged.
    #[must_use]
    pub fn clamped(self) -> Self {
        let norm = self.norm();
        if norm > 1.0 {
            Self::new(self.x / norm, self.y / norm, self.z / norm)
        } else {
            self
        }
    }

    /// Polar angle θ in `[0, π]`.
    pub fn theta(&self) -> f64 {
        let norm = self.norm();
        if norm == 0.0 {
            0.0
        } else {
            (self.z / norm).clamp(-1.0, 1.0).acos()
        }
    }

    /// Azimuthal angle φ in `(−π, π]`.
    pub fn phi(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

impl fmt::Display for BlochVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

/// A pure single-qubit state `α|0⟩ + β|1⟩`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleQubitState {
    alpha: Complex64,
    beta: Complex64,
}

impl SingleQubitState {
    /// Create a state from amplitudes, normalising them.
    ///
    /// A zero vector is mapped to `|0⟩`.
    pub fn new(alpha: Complex64, beta: Complex64) -> Self {
        let norm = (alpha.norm_sqr() + beta.norm_sqr()).sqrt();
        if norm == 0.0 {
            return Self::zero();
        }
        Self {
            alpha: alpha / norm,
            beta: beta / norm,
        }
    }

    /// The `|0⟩` state.
    pub fn zero() -> Self {
        Self {
            alpha: Complex64::new(1.0, 0.0),
            beta: Complex64::new(0.0, 0.0),
        }
    }

    /// The state `Rz(φ)·Ry(θ)|0⟩`.
    pub fn from_rotations(theta: f64, phi: f64) -> Self {
        let (s, c) = (theta / 2.0).sin_cos();
        Self {
            alpha: Complex64::from_polar(c, -phi / 2.0),
            beta: Complex64::from_polar(s, phi / 2.0),
        }
    }

    /// Amplitude of `|0⟩`.
    pub fn alpha(&self) -> Complex64 {
        self.alpha
    }

    /// Amplitude of `|1⟩`.
    pub fn beta(&self) -> Complex64 {
        self.beta
    }

    /// Bloch vector of this state (always on the sphere).
    pub fn bloch_vector(&self) -> BlochVector {
        let cross = self.alpha.conj() * self.beta;
        BlochVector::new(
            2.0 * cross.re,
            2.0 * cross.im,
            self.alpha.norm_sqr() - self.beta.norm_sqr(),
        )
    }
}

/// A 2×2 single-qubit density matrix.
///
/// Instances are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    data: Array2<Complex64>,
}

/// Build `½(I + ex·X + ey·Y + ez·Z)` from three expectation values.
///
/// The Bloch vector is clamped to the unit ball first, so the result is
/// always a valid state. This never fails.
pub fn reconstruct_density(ex: f64, ey: f64, ez: f64) -> DensityMatrix {
    DensityMatrix::from_bloch(BlochVector::new(ex, ey, ez))
}

impl DensityMatrix {
    /// Density matrix of a Bloch vector, clamped to the unit ball.
    pub fn from_bloch(r: BlochVector) -> Self {
        let r = r.clamped();
        let c = |re: f64, im: f64| Complex64::new(re / 2.0, im / 2.0);
        Self {
            data: array![
                [c(1.0 + r.z, 0.0), c(r.x, -r.y)],
                [c(r.x, r.y), c(1.0 - r.z, 0.0)]
            ],
        }
    }

    /// `|ψ⟩⟨ψ|` for a pure state.
    pub fn from_pure(state: &SingleQubitState) -> Self {
        let v = [state.alpha(), state.beta()];
        Self {
            data: Array2::from_shape_fn((2, 2), |(i, j)| v[i] * v[j].conj()),
        }
    }

    /// The maximally mixed state `½I`.
    pub fn maximally_mixed() -> Self {
        Self::from_bloch(BlochVector::default())
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.data
    }

    /// Element `(row, col)`; both indices must be 0 or 1.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[[row, col]]
    }

    /// Recover the Bloch vector.
    pub fn bloch_vector(&self) -> BlochVector {
        let off = self.data[[1, 0]];
        BlochVector::new(
            2.0 * off.re,
            2.0 * off.im,
            (self.data[[0, 0]] - self.data[[1, 1]]).re,
        )
    }

    /// Trace (1 for every matrix this type builds).
    pub fn trace(&self) -> f64 {
        self.data.diag().sum().re
    }

    /// Purity `Tr(ρ²)`, 1 for pure states and ½ for `½I`.
    pub fn purity(&self) -> f64 {
        self.data.dot(&self.data).diag().sum().re
    }

    /// Determinant; zero for pure states.
    pub fn determinant(&self) -> f64 {
        let d = self.data[[0, 0]] * self.data[[1, 1]] - self.data[[0, 1]] * self.data[[1, 0]];
        d.re
    }

    /// Fidelity `⟨ψ|ρ|ψ⟩` with a pure state.
    pub fn fidelity_with_pure(&self, state: &SingleQubitState) -> f64 {
        let v = [state.alpha(), state.beta()];
        let mut acc = Complex64::new(0.0, 0.0);
        for i in 0..2 {
            for j in 0..2 {
                acc += v[i].conj() * self.data[[i, j]] * v[j];
            }
        }
        acc.re.clamp(0.0, 1.0)
    }

    /// Uhlmann fidelity `(Tr √(√ρ σ √ρ))²` with another qubit state.
    ///
    /// For 2×2 matrices this equals `Tr(ρσ) + 2√(det ρ · det σ)`.
    pub fn fidelity(&self, other: &DensityMatrix) -> f64 {
        let overlap = self.data.dot(&other.data).diag().sum().re;
        let dets = (self.determinant() * other.determinant()).max(0.0);
        (overlap + 2.0 * dets.sqrt()).clamp(0.0, 1.0)
    }

    /// Rows as `(re, im)` pairs.
    pub fn to_rows(&self) -> [[(f64, f64); 2]; 2] {
        let e = |i: usize, j: usize| (self.data[[i, j]].re, self.data[[i, j]].im);
        [[e(0, 0), e(0, 1)], [e(1, 0), e(1, 1)]]
    }
}

impl Serialize for DensityMatrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr {
            real: [[f64; 2]; 2],
            imag: [[f64; 2]; 2],
            bloch: BlochVector,
            purity: f64,
        }

        let rows = self.to_rows();
        Repr {
            real: rows.map(|r| r.map(|(re, _)| re)),
            imag: rows.map(|r| r.map(|(_, im)| im)),
            bloch: self.bloch_vector(),
            purity: self.purity(),
        }
        .serialize(serializer)
    }
}

fn format_complex(c: Complex64) -> String {
    let sign = if c.im < 0.0 { '-' } else { '+' };
    format!("{:.4}{}{:.4}j", c.re, sign, c.im.abs())
}

impl fmt::Display for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = |i, j| format_complex(self.data[[i, j]]);
        writeln!(f, "[[{}, {}],", cell(0, 0), cell(0, 1))?;
        write!(f, " [{}, {}]]", cell(1, 0), cell(1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-10;

    #[test]
    fn test_zero_state_roundtrip() {
        let rho = reconstruct_density(0.0, 0.0, 1.0);
        assert!((rho.get(0, 0).re - 1.0).abs() < EPS);
        assert!(rho.get(0, 1).norm() < EPS);
        assert!(rho.get(1, 0).norm() < EPS);
        assert!(rho.get(1, 1).norm() < EPS);
    }

    #[test]
    fn test_clamp_rescales_outside() {
        let rho = reconstruct_density(1.0, 1.0, 0.0);
        let r = rho.bloch_vector();
        assert!((r.norm() - 1.0).abs() < EPS);
        assert!((r.x - r.y).abs() < EPS);
        assert!((rho.purity() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_inside_unchanged() {
        let r = BlochVector::new(0.3, -0.2, 0.5);
        assert_eq!(r.clamped(), r);
        let back = DensityMatrix::from_bloch(r).bloch_vector();
        assert!((back.x - 0.3).abs() < EPS);
        assert!((back.y + 0.2).abs() < EPS);
        assert!((back.z - 0.5).abs() < EPS);
    }

    #[test]
    fn test_maximally_mixed() {
        let rho = DensityMatrix::maximally_mixed();
        assert!((rho.trace() - 1.0).abs() < EPS);
        assert!((rho.purity() - 0.5).abs() < EPS);
        assert!((rho.get(0, 0).re - 0.5).abs() < EPS);
    }

    #[test]
    fn test_from_rotations_bloch() {
        let state = SingleQubitState::from_rotations(PI / 3.0, FRAC_PI_2);
        let r = state.bloch_vector();
        assert!((r.theta() - PI / 3.0).abs() < 1e-9);
        assert!((r.phi() - FRAC_PI_2).abs() < 1e-9);
        assert!((r.norm() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_pure_fidelity() {
        let state = SingleQubitState::from_rotations(0.5, 1.0);
        let rho = DensityMatrix::from_pure(&state);
        assert!((rho.fidelity_with_pure(&state) - 1.0).abs() < EPS);
        assert!(rho.determinant().abs() < EPS);

        let mixed = DensityMatrix::maximally_mixed();
        assert!((mixed.fidelity_with_pure(&state) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_mixed_fidelity_matches_pure_case() {
        let state = SingleQubitState::from_rotations(1.2, -0.4);
        let pure = DensityMatrix::from_pure(&state);
        let noisy = reconstruct_density(0.2, 0.1, 0.6);
        assert!((noisy.fidelity(&pure) - noisy.fidelity_with_pure(&state)).abs() < 1e-9);
        assert!((noisy.fidelity(&noisy) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        let text = DensityMatrix::maximally_mixed().to_string();
        assert_eq!(
            text,
            "[[0.5000+0.0000j, 0.0000+0.0000j],\n [0.0000+0.0000j, 0.5000+0.0000j]]"
        );
    }
}
