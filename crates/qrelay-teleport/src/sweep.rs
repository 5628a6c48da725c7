//! Parameter sweeps over noise strength.
//!
//! Every point builds its own circuit, noise model and simulator backend, so
//! points share no state and can be evaluated concurrently. Results always
//! come back in the order of the input parameters.

use futures::future::try_join_all;
use qrelay_adapter_sim::{NoiseModel, SimulatorBackend, SimulatorConfig};
use qrelay_hal::{Backend, Counts};
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::ExperimentConfig;
use crate::density::SingleQubitState;
use crate::error::{TeleportError, TeleportResult};
use crate::noise::{BellPairNoise, add_delay_with_dephasing};
use crate::teleport::{
    apply_feedforward, build_teleportation_circuit, degrade_bell_pair, generate_bell_pair,
    ideal_state, measure_all,
};
use crate::tomography::{TomographyResult, tomography_after_feedforward};

/// Seed stride between sweep points; each point submits three jobs.
const SEED_STRIDE: u64 = 1_000;

/// `n` evenly spaced values from `start` to `stop`, both included.
///
/// `n == 1` yields `[start]`; `n == 0` yields nothing.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// One evaluated parameter value.
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    /// Swept parameter (delay or noise strength).
    pub parameter: f64,
    /// Fidelity of Bob's reconstructed state with the ideal input state.
    pub fidelity: f64,
    /// Full tomography data.
    pub tomography: TomographyResult,
}

/// A labelled sequence of sweep points.
#[derive(Debug, Clone, Serialize)]
pub struct SweepSeries {
    /// Series label, used in plot legends.
    pub label: String,
    /// Points in input order.
    pub points: Vec<SweepPoint>,
}

impl SweepSeries {
    /// Swept parameter values.
    pub fn parameters(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.parameter).collect()
    }

    /// Fidelities, aligned with [`Self::parameters`].
    pub fn fidelities(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.fidelity).collect()
    }
}

/// A fresh simulator for sweep point `index`.
fn point_backend(config: &ExperimentConfig, index: usize, noise: NoiseModel) -> SimulatorBackend {
    let mut sim = SimulatorConfig::default().with_noise_model(noise);
    if let Some(seed) = config.seed {
        sim = sim.with_seed(seed.wrapping_add(SEED_STRIDE * index as u64));
    }
    SimulatorBackend::with_config(sim)
}

fn score(parameter: f64, ideal: &SingleQubitState, tomography: TomographyResult) -> SweepPoint {
    SweepPoint {
        parameter,
        fidelity: tomography.density.fidelity_with_pure(ideal),
        tomography,
    }
}

/// Teleport with Bob idling for `delay` before the corrections.
async fn dephasing_point(
    config: &ExperimentConfig,
    index: usize,
    delay: f64,
) -> TeleportResult<SweepPoint> {
    let mut tc = build_teleportation_circuit(config.theta, config.phi, None)?;
    let noise =
        add_delay_with_dephasing(&mut tc.circuit, tc.bob_qubit, delay, config.dephasing.t2)?;
    apply_feedforward(&mut tc)?;

    let backend = point_backend(config, index, noise);
    let tomography = tomography_after_feedforward(&tc, &backend, config.shots).await?;
    Ok(score(delay, &ideal_state(config.theta, config.phi), tomography))
}

/// Fidelity as a function of feed-forward delay.
///
/// `on_point` sees each point as soon as it is evaluated, which may be out
/// of input order.
#[instrument(skip(config, on_point), fields(t2 = config.dephasing.t2))]
pub async fn dephasing_sweep(
    config: &ExperimentConfig,
    on_point: impl Fn(&SweepPoint) + Sync,
) -> TeleportResult<SweepSeries> {
    let on_point = &on_point;
    let delays = config.dephasing.delays();
    let points = try_join_all(delays.iter().enumerate().map(|(i, &delay)| async move {
        let point = dephasing_point(config, i, delay).await?;
        on_point(&point);
        Ok::<_, TeleportError>(point)
    }))
    .await?;

    info!(points = points.len(), "dephasing sweep finished");
    Ok(SweepSeries {
        label: "dephasing".into(),
        points,
    })
}

/// Teleport through a Bell pair degraded by `kind` at strength `p`.
async fn bellpair_noise_point(
    config: &ExperimentConfig,
    kind: BellPairNoise,
    index: usize,
    p: f64,
) -> TeleportResult<SweepPoint> {
    let degraded = degrade_bell_pair(&generate_bell_pair()?)?;
    let mut tc = build_teleportation_circuit(config.theta, config.phi, Some(&degraded))?;
    apply_feedforward(&mut tc)?;

    let backend = point_backend(config, index, kind.noise_model(p)?);
    let tomography = tomography_after_feedforward(&tc, &backend, config.shots).await?;
    Ok(score(p, &ideal_state(config.theta, config.phi), tomography))
}

/// Fidelity as a function of Bell-pair noise strength, reporting points to
/// `on_point` like [`dephasing_sweep`].
#[instrument(skip(config, on_point))]
pub async fn bellpair_noise_sweep(
    config: &ExperimentConfig,
    kind: BellPairNoise,
    on_point: impl Fn(&SweepPoint) + Sync,
) -> TeleportResult<SweepSeries> {
    let on_point = &on_point;
    let strengths = config.bell_pair.strengths();
    let points = try_join_all(strengths.iter().enumerate().map(|(i, &p)| async move {
        let point = bellpair_noise_point(config, kind, i, p).await?;
        on_point(&point);
        Ok::<_, TeleportError>(point)
    }))
    .await?;

    info!(points = points.len(), "Bell-pair noise sweep finished");
    Ok(SweepSeries {
        label: kind.key().into(),
        points,
    })
}

/// Raw two-qubit counts of a degraded, measured Bell pair.
pub async fn bell_pair_counts(
    kind: BellPairNoise,
    p: f64,
    shots: u32,
    seed: Option<u64>,
) -> TeleportResult<Counts> {
    let circuit = measure_all(&degrade_bell_pair(&generate_bell_pair()?)?)?;

    let mut sim = SimulatorConfig::default().with_noise_model(kind.noise_model(p)?);
    if let Some(seed) = seed {
        sim = sim.with_seed(seed);
    }
    let backend = SimulatorBackend::with_config(sim);
    Ok(backend.run(&circuit, shots).await?.counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 0), Vec::<f64>::new());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);

        let delays = linspace(0.0, 1000.0, 13);
        assert_eq!(delays.len(), 13);
        assert_eq!(delays[12], 1000.0);
    }

    #[test]
    fn test_series_accessors() {
        let series = SweepSeries {
            label: "x".into(),
            points: vec![
                score(
                    0.0,
                    &SingleQubitState::zero(),
                    TomographyResult::from_counts(Default::default()),
                ),
            ],
        };
        assert_eq!(series.parameters(), vec![0.0]);
        assert!((series.fidelities()[0] - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_amplitude_damped_pair_collapses() {
        let counts = bell_pair_counts(BellPairNoise::AmplitudeDamping, 1.0, 200, Some(3))
            .await
            .unwrap();
        assert_eq!(counts.get("00"), 200);
    }

    #[tokio::test]
    async fn test_sweep_reports_every_point() {
        let mut config = ExperimentConfig {
            shots: 50,
            seed: Some(5),
            ..Default::default()
        };
        config.dephasing.points = 3;

        let seen = AtomicUsize::new(0);
        let series = dephasing_sweep(&config, |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        })
        .await
        .unwrap();

        assert_eq!(series.points.len(), 3);
        assert_eq!(seen.load(Ordering::Relaxed), 3);
    }
}
