//! Integration tests for the demo suite.
//!
//! Each scenario runs with few shots and a fixed seed into a scratch
//! directory, then the report and written files are checked.

use std::path::PathBuf;

use qrelay_demos::scenarios::{run_bellpair_scenario, run_dephasing_scenario, run_teleport_scenario};
use qrelay_demos::{CommonArgs, write_json};
use qrelay_teleport::{BellPairNoise, ExperimentConfig};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("qrelay-demos-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn small_config(name: &str) -> ExperimentConfig {
    let mut config = ExperimentConfig {
        shots: 400,
        seed: Some(5),
        output_dir: scratch_dir(name),
        ..Default::default()
    };
    config.dephasing.points = 3;
    config.dephasing.max_delay = 300.0;
    config.bell_pair.points = 3;
    config.bell_pair.histogram_shots = 200;
    config
}

#[tokio::test]
async fn test_teleport_scenario_writes_every_figure() {
    let config = small_config("teleport");
    let report = run_teleport_scenario(&config).await.unwrap();

    assert!(report.fidelity > 0.85, "fidelity {}", report.fidelity);
    assert_eq!(report.postselected.len(), 4);
    let kept: u64 = report
        .postselected
        .iter()
        .map(|s| s.tomography.counts.z.total())
        .sum();
    assert!(kept > 0);

    for name in [
        "circuit_till_bell_measurement.svg",
        "alice_initial.svg",
        "bob_bloch_post_00.svg",
        "bob_bloch_post_11.svg",
        "circuit_after_feedforward.svg",
        "bob_final_X.svg",
        "bob_final_Y.svg",
        "bob_final_Z.svg",
        "Bob_final.svg",
        "teleport_report.json",
    ] {
        let path = config.output_dir.join(name);
        assert!(path.exists(), "missing {}", path.display());
        assert!(report.files.contains(&path), "unreported {}", path.display());
    }

    let json = std::fs::read_to_string(config.output_dir.join("teleport_report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["timestamp"].is_string());
    assert_eq!(value["config"]["shots"], 400);

    std::fs::remove_dir_all(&config.output_dir).ok();
}

#[tokio::test]
async fn test_postselected_outcomes_match_ideal_before_correction() {
    let config = small_config("postselect");
    let report = run_teleport_scenario(&config).await.unwrap();

    let no_correction = report
        .postselected
        .iter()
        .find(|s| s.outcome == "00")
        .unwrap();
    assert!(no_correction.fidelity > 0.8, "fidelity {}", no_correction.fidelity);

    std::fs::remove_dir_all(&config.output_dir).ok();
}

#[tokio::test]
async fn test_dephasing_scenario() {
    let config = small_config("dephasing");
    let report = run_dephasing_scenario(&config).await.unwrap();

    assert_eq!(report.series.len(), 1);
    let series = &report.series[0];
    assert_eq!(series.parameters(), vec![0.0, 150.0, 300.0]);

    let fidelities = series.fidelities();
    assert!(fidelities[0] > 0.85);
    assert!(fidelities[2] < fidelities[0]);

    assert!(config.output_dir.join("dephasing_fidelity.svg").exists());
    assert!(config.output_dir.join("dephasing_sweep.json").exists());

    std::fs::remove_dir_all(&config.output_dir).ok();
}

#[tokio::test]
async fn test_bellpair_scenario() {
    let config = small_config("bellpair");
    let report = run_bellpair_scenario(&config).await.unwrap();

    let labels: Vec<_> = report.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["depolarizing", "amplitude_damping"]);
    for series in &report.series {
        assert_eq!(series.parameters(), vec![0.0, 0.5, 1.0]);
        assert!(series.fidelities()[0] > 0.85);
    }

    for name in [
        "Bell_pair_Depolarizing.svg",
        "Bell_pair_Amplitude_Damping.svg",
        "bellpair_noise_fidelity.svg",
        "bellpair_noise_sweep.json",
    ] {
        assert!(config.output_dir.join(name).exists(), "missing {name}");
    }

    std::fs::remove_dir_all(&config.output_dir).ok();
}

#[tokio::test]
async fn test_bellpair_scenario_single_kind() {
    let mut config = small_config("bellpair-single");
    config.bell_pair.kinds = vec![BellPairNoise::AmplitudeDamping];
    let report = run_bellpair_scenario(&config).await.unwrap();

    assert_eq!(report.series.len(), 1);
    assert!(!config.output_dir.join("Bell_pair_Depolarizing.svg").exists());

    std::fs::remove_dir_all(&config.output_dir).ok();
}

#[test]
fn test_flags_override_config_file() {
    let dir = scratch_dir("args");
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("experiment.yaml");
    std::fs::write(&file, "shots: 123\ntheta: 0.25\n").unwrap();

    let args = CommonArgs {
        config: Some(file),
        shots: Some(77),
        seed: Some(9),
        ..Default::default()
    };
    let config = args.load_config().unwrap();
    assert_eq!(config.shots, 77);
    assert_eq!(config.seed, Some(9));
    assert!((config.theta - 0.25).abs() < 1e-12);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_config_file_is_an_error() {
    let args = CommonArgs {
        config: Some(PathBuf::from("/nonexistent/qrelay.yaml")),
        ..Default::default()
    };
    assert!(args.load_config().is_err());
}

#[test]
fn test_write_json_creates_parents() {
    let dir = scratch_dir("json");
    let path = write_json(&ExperimentConfig::default(), dir.join("nested/config.json")).unwrap();
    let loaded = ExperimentConfig::from_file(&path).unwrap();
    assert_eq!(loaded, ExperimentConfig::default());

    std::fs::remove_dir_all(&dir).ok();
}
