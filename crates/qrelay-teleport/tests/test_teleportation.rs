//! End-to-end teleportation and tomography tests on the local simulator.

use qrelay_adapter_sim::{SimulatorBackend, SimulatorConfig};
use qrelay_hal::Counts;
use qrelay_teleport::{
    BasisCounts, BellPairNoise, BitSelector, DensityMatrix, ExperimentConfig, TeleportError,
    TomographyResult, apply_feedforward, bellpair_noise_sweep, build_teleportation_circuit,
    dephasing_sweep, ideal_state, tomography_after_feedforward, tomography_postselected,
};

fn seeded(seed: u64) -> SimulatorBackend {
    SimulatorBackend::with_config(SimulatorConfig::default().with_seed(seed))
}

fn small_config(seed: u64) -> ExperimentConfig {
    let mut config = ExperimentConfig {
        shots: 2000,
        seed: Some(seed),
        ..Default::default()
    };
    config.dephasing.points = 3;
    config.dephasing.max_delay = 600.0;
    config.bell_pair.points = 3;
    config
}

#[tokio::test]
async fn test_prepare_and_teleport() {
    let (theta, phi) = (0.5, 1.0);
    let mut tc = build_teleportation_circuit(theta, phi, None).unwrap();
    apply_feedforward(&mut tc).unwrap();

    let result = tomography_after_feedforward(&tc, &seeded(11), 1000)
        .await
        .unwrap();

    let fid = result.density.fidelity_with_pure(&ideal_state(theta, phi));
    assert!(fid > 0.9, "fidelity {fid}");
    assert!((result.density.trace() - 1.0).abs() < 1e-12);
}

#[tokio::test]
async fn test_without_feedforward_state_is_scrambled() {
    let (theta, phi) = (0.0, 0.0);
    let tc = build_teleportation_circuit(theta, phi, None).unwrap();

    let result = tomography_after_feedforward(&tc, &seeded(5), 2000)
        .await
        .unwrap();

    // Averaged over Bell outcomes, Bob holds the maximally mixed state.
    let fid = result.density.fidelity_with_pure(&ideal_state(theta, phi));
    assert!((fid - 0.5).abs() < 0.08, "fidelity {fid}");
}

#[tokio::test]
async fn test_postselected_outcome_00_needs_no_correction() {
    let (theta, phi) = (1.1, 0.4);
    let tc = build_teleportation_circuit(theta, phi, None).unwrap();

    let result = tomography_postselected(&tc, &seeded(21), 4000, "00")
        .await
        .unwrap();

    let selected = result.counts.z.total();
    assert!(selected > 700 && selected < 1300, "selected {selected}");
    let fid = result.density.fidelity_with_pure(&ideal_state(theta, phi));
    assert!(fid > 0.9, "fidelity {fid}");
}

#[tokio::test]
async fn test_postselected_outcome_10_is_z_rotated() {
    let (theta, phi) = (1.1, 0.4);
    let tc = build_teleportation_circuit(theta, phi, None).unwrap();

    let result = tomography_postselected(&tc, &seeded(22), 4000, "10")
        .await
        .unwrap();

    let ideal = ideal_state(theta, phi).bloch_vector();
    let r = result.density.bloch_vector();
    assert!((r.x + ideal.x).abs() < 0.15, "x {} vs {}", r.x, -ideal.x);
    assert!((r.y + ideal.y).abs() < 0.15, "y {} vs {}", r.y, -ideal.y);
    assert!((r.z - ideal.z).abs() < 0.15, "z {} vs {}", r.z, ideal.z);
}

#[tokio::test]
async fn test_postselect_rejects_bad_pattern() {
    let tc = build_teleportation_circuit(0.5, 1.0, None).unwrap();
    let err = tomography_postselected(&tc, &seeded(1), 10, "2")
        .await
        .unwrap_err();
    assert!(matches!(err, TeleportError::InvalidPattern(_)));
}

#[test]
fn test_never_matching_pattern_gives_maximally_mixed() {
    let tc = build_teleportation_circuit(0.5, 1.0, None).unwrap();
    let selector = BitSelector::new(&tc.circuit);
    let aux = [tc.a0_bit, tc.a1_bit];

    // a1=0, a0=0 in every shot
    let counts: Counts = [("0 0 0", 400), ("0 0 1", 600)].into_iter().collect();
    let post = selector
        .postselect(&counts, tc.bob_bit, aux, "11")
        .unwrap();
    assert!(post.is_empty());

    let result = TomographyResult::from_counts(BasisCounts {
        x: post,
        y: post,
        z: post,
    });
    assert_eq!(result.density, DensityMatrix::maximally_mixed());
}

#[test]
fn test_malformed_outcome_is_reported() {
    let tc = build_teleportation_circuit(0.5, 1.0, None).unwrap();
    let selector = BitSelector::new(&tc.circuit);

    let counts: Counts = [("0 1", 10)].into_iter().collect();
    let err = selector.marginalize(&counts, tc.bob_bit).unwrap_err();
    assert!(matches!(
        err,
        TeleportError::MalformedOutcome { position: 2, .. }
    ));
}

#[tokio::test]
async fn test_dephasing_sweep_degrades_fidelity() {
    let config = small_config(100);
    let series = dephasing_sweep(&config, |_| {}).await.unwrap();
    let fids = series.fidelities();

    assert_eq!(series.parameters(), vec![0.0, 300.0, 600.0]);
    assert!(fids[0] > 0.9, "{fids:?}");
    // non-increasing up to shot noise
    assert!(fids[1] <= fids[0] + 0.05, "{fids:?}");
    assert!(fids[2] <= fids[1] + 0.05, "{fids:?}");
    // theta = pi/3 fully dephased: (1 + cos^2 theta) / 2
    assert!((fids[2] - 0.625).abs() < 0.08, "{fids:?}");
}

#[tokio::test]
async fn test_full_depolarizing_bell_pair_destroys_teleportation() {
    let config = small_config(200);
    let series = bellpair_noise_sweep(&config, BellPairNoise::Depolarizing, |_| {})
        .await
        .unwrap();
    let fids = series.fidelities();

    assert_eq!(series.label, "depolarizing");
    assert!(fids[0] > 0.9, "{fids:?}");
    assert!((fids[2] - 0.5).abs() < 0.08, "{fids:?}");
}
