//! Pure state of a single shot.
//!
//! Qubit `k` is bit `k` of the amplitude index. Measurement, reset and Kraus
//! sampling are the non-unitary steps a trajectory needs; each leaves the
//! state normalized.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use num_complex::Complex64;
use rand::Rng;

use qrelay_ir::{Matrix2, StandardGate};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

fn real(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

fn phase(theta: f64) -> Matrix2 {
    [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]]
}

fn rx(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    let off = Complex64::new(0.0, -s);
    [[real(c), off], [off, real(c)]]
}

/// Matrix of a one-qubit gate. `None` for two-qubit gates.
fn one_qubit_matrix(gate: &StandardGate) -> Option<Matrix2> {
    let m = match *gate {
        StandardGate::I => [[ONE, ZERO], [ZERO, ONE]],
        StandardGate::X => [[ZERO, ONE], [ONE, ZERO]],
        StandardGate::Y => [[ZERO, -Complex64::i()], [Complex64::i(), ZERO]],
        StandardGate::Z => [[ONE, ZERO], [ZERO, -ONE]],
        StandardGate::H => {
            let h = real(FRAC_1_SQRT_2);
            [[h, h], [h, -h]]
        }
        StandardGate::S => phase(FRAC_PI_2),
        StandardGate::Sdg => phase(-FRAC_PI_2),
        StandardGate::T => phase(FRAC_PI_4),
        StandardGate::Tdg => phase(-FRAC_PI_4),
        StandardGate::SX => rx(FRAC_PI_2),
        StandardGate::Rx(theta) => rx(theta),
        StandardGate::Ry(theta) => {
            let (s, c) = (theta / 2.0).sin_cos();
            [[real(c), real(-s)], [real(s), real(c)]]
        }
        StandardGate::Rz(theta) => [
            [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
        ],
        StandardGate::P(theta) => phase(theta),
        StandardGate::CX | StandardGate::CZ | StandardGate::Swap => return None,
    };
    Some(m)
}

#[derive(Debug, Clone)]
pub struct Statevector {
    amps: Vec<Complex64>,
}

impl Statevector {
    /// `|0…0⟩` on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        let mut amps = vec![ZERO; 1 << num_qubits];
        amps[0] = ONE;
        Self { amps }
    }

    /// Apply `gate` to `qubits`, control first for `CX` and `CZ`.
    pub fn apply_gate(&mut self, gate: &StandardGate, qubits: &[usize]) {
        if let Some(m) = one_qubit_matrix(gate) {
            self.apply_matrix(qubits[0], &m);
            return;
        }
        let (a, b): (usize, usize) = (1 << qubits[0], 1 << qubits[1]);
        for i in 0..self.amps.len() {
            let (on_a, on_b) = (i & a != 0, i & b != 0);
            match gate {
                StandardGate::CX if on_a && !on_b => self.amps.swap(i, i | b),
                StandardGate::CZ if on_a && on_b => self.amps[i] = -self.amps[i],
                StandardGate::Swap if on_a && !on_b => self.amps.swap(i, i ^ a ^ b),
                _ => {}
            }
        }
    }

    /// Apply a 2×2 matrix to one qubit. The result is not renormalized.
    pub fn apply_matrix(&mut self, qubit: usize, m: &Matrix2) {
        let mask = 1 << qubit;
        for i in (0..self.amps.len()).filter(|i| i & mask == 0) {
            let (a, b) = (self.amps[i], self.amps[i | mask]);
            self.amps[i] = m[0][0] * a + m[0][1] * b;
            self.amps[i | mask] = m[1][0] * a + m[1][1] * b;
        }
    }

    /// Probability of reading 1 on `qubit`.
    pub fn prob_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amps
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Z-basis measurement of `qubit`, collapsing the state onto the outcome.
    pub fn measure<R: Rng>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let outcome = rng.r#gen::<f64>() < self.prob_one(qubit);
        let mask = 1 << qubit;
        for (i, amp) in self.amps.iter_mut().enumerate() {
            if (i & mask != 0) != outcome {
                *amp = ZERO;
            }
        }
        self.normalize();
        outcome
    }

    /// Measure, then flip a 1 back to 0.
    pub fn reset<R: Rng>(&mut self, qubit: usize, rng: &mut R) {
        if self.measure(qubit, rng) {
            self.apply_gate(&StandardGate::X, &[qubit]);
        }
    }

    /// Apply one operator of a Kraus set, picking `K_i` with probability
    /// `‖K_i ψ‖²`. Returns `i`.
    pub fn apply_kraus<R: Rng>(
        &mut self,
        qubit: usize,
        operators: &[Matrix2],
        rng: &mut R,
    ) -> usize {
        let chosen = if operators.len() > 1 {
            let r: f64 = rng.r#gen();
            let mut acc = 0.0;
            operators
                .iter()
                .position(|k| {
                    acc += self.kraus_weight(qubit, k);
                    r < acc
                })
                .unwrap_or(operators.len() - 1)
        } else {
            0
        };
        if let Some(k) = operators.get(chosen) {
            self.apply_matrix(qubit, k);
            self.normalize();
        }
        chosen
    }

    fn kraus_weight(&self, qubit: usize, k: &Matrix2) -> f64 {
        let mask = 1 << qubit;
        (0..self.amps.len())
            .filter(|i| i & mask == 0)
            .map(|i| {
                let (a, b) = (self.amps[i], self.amps[i | mask]);
                (k[0][0] * a + k[0][1] * b).norm_sqr() + (k[1][0] * a + k[1][1] * b).norm_sqr()
            })
            .sum()
    }

    fn normalize(&mut self) {
        let norm = self.amps.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
        if norm > 0.0 {
            for amp in &mut self.amps {
                *amp /= norm;
            }
        }
    }
}
