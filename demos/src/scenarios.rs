//! The experiment scenarios behind the demo binaries.
//!
//! Each scenario writes its figures and a JSON report under
//! `config.output_dir` and returns the report.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use qrelay_adapter_sim::{SimulatorBackend, SimulatorConfig};
use qrelay_teleport::render::{
    self, plot_bellpair_noise, plot_bloch_state, plot_bob_histograms, plot_circuit, plot_counts,
    plot_dephasing_noise, plot_postselected_bob_blochs,
};
use qrelay_teleport::sweep::bell_pair_counts;
use qrelay_teleport::{
    BELL_OUTCOMES, DensityMatrix, ExperimentConfig, SweepSeries, TeleportError, TomographyResult,
    bellpair_noise_sweep, build_teleportation_circuit, dephasing_sweep, ideal_state,
    tomography_after_feedforward, tomography_postselected,
};
use serde::Serialize;
use tracing::info;

use crate::{
    create_progress_bar, print_info, print_result, print_section, print_success, print_written,
    write_json,
};

/// Seed offset between the independent runs of one scenario.
const RUN_SEED_STRIDE: u64 = 17;

/// Bob's state for one Bell-measurement outcome.
#[derive(Debug, Clone, Serialize)]
pub struct PostselectedState {
    pub outcome: String,
    pub fidelity: f64,
    pub tomography: TomographyResult,
}

/// Everything the teleport scenario measured.
#[derive(Debug, Clone, Serialize)]
pub struct TeleportReport {
    pub timestamp: DateTime<Utc>,
    pub config: ExperimentConfig,
    pub alice: DensityMatrix,
    pub postselected: Vec<PostselectedState>,
    pub bob: TomographyResult,
    pub fidelity: f64,
    pub files: Vec<PathBuf>,
}

/// A fidelity sweep and the files it produced.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub timestamp: DateTime<Utc>,
    pub config: ExperimentConfig,
    pub series: Vec<SweepSeries>,
    pub files: Vec<PathBuf>,
}

fn backend(config: &ExperimentConfig, run: u64) -> SimulatorBackend {
    let mut sim = SimulatorConfig::default();
    if let Some(seed) = config.seed {
        sim = sim.with_seed(seed.wrapping_add(RUN_SEED_STRIDE * run));
    }
    SimulatorBackend::with_config(sim)
}

fn print_density(label: &str, rho: &DensityMatrix) {
    println!("{label}");
    println!("{}", render::terminal::density_matrix_block(rho));
}

/// Full teleportation walkthrough.
///
/// Draws the circuit up to the Bell measurement, shows Alice's state,
/// reconstructs Bob's state for each Bell outcome without corrections, then
/// applies feed-forward and reconstructs Bob's final state.
pub async fn run_teleport_scenario(config: &ExperimentConfig) -> anyhow::Result<TeleportReport> {
    let dir = &config.output_dir;
    let ideal = ideal_state(config.theta, config.phi);
    let mut files = Vec::new();

    print_section("Teleportation circuit");
    let tc = build_teleportation_circuit(config.theta, config.phi, None)?;
    print_result("θ", format!("{:.4}", config.theta));
    print_result("φ", format!("{:.4}", config.phi));
    print_result("Qubits", tc.circuit.num_qubits());
    print_result("Depth", tc.circuit.depth());
    files.push(plot_circuit(
        &tc.circuit,
        dir.join("circuit_till_bell_measurement.svg"),
        "Teleportation up to the Bell measurement",
    )?);

    print_section("Alice's input state");
    let alice = DensityMatrix::from_pure(&ideal);
    print_density("Alice's Density Matrix:", &alice);
    files.push(plot_bloch_state(
        alice.bloch_vector(),
        dir.join("alice_initial.svg"),
        "Alice's initial state",
    )?);

    print_section("Bob before feed-forward");
    let runs = BELL_OUTCOMES.iter().enumerate().map(|(i, &outcome)| {
        let backend = backend(config, i as u64 + 1);
        let tc = &tc;
        async move {
            let tomography = tomography_postselected(tc, &backend, config.shots, outcome).await?;
            Ok::<_, TeleportError>(PostselectedState {
                outcome: outcome.to_string(),
                fidelity: tomography.density.fidelity_with_pure(&ideal),
                tomography,
            })
        }
    });
    let postselected = try_join_all(runs).await?;
    for state in &postselected {
        print_result(
            &format!("a0 a1 = {}", state.outcome),
            format!(
                "r = {}  kept {} shots",
                state.tomography.density.bloch_vector(),
                state.tomography.counts.z.total()
            ),
        );
    }
    let blochs: Vec<(String, DensityMatrix)> = postselected
        .iter()
        .map(|s| (s.outcome.clone(), s.tomography.density.clone()))
        .collect();
    files.extend(plot_postselected_bob_blochs(&blochs, dir)?);

    print_section("Bob after feed-forward");
    let tc = tc.with_feedforward()?;
    files.push(plot_circuit(
        &tc.circuit,
        dir.join("circuit_after_feedforward.svg"),
        "Teleportation with feed-forward",
    )?);

    let bob = tomography_after_feedforward(&tc, &backend(config, 0), config.shots).await?;
    print_result("⟨X⟩", format!("{:.4}", bob.expectations.x));
    print_result("⟨Y⟩", format!("{:.4}", bob.expectations.y));
    print_result("⟨Z⟩", format!("{:.4}", bob.expectations.z));
    files.extend(plot_bob_histograms(&bob.counts, dir, "bob_final")?);
    print_density("Bob's Density Matrix:", &bob.density);
    files.push(plot_bloch_state(
        bob.density.bloch_vector(),
        dir.join("Bob_final.svg"),
        "Bob's final state",
    )?);

    let fidelity = bob.density.fidelity_with_pure(&ideal);
    print_result("Fidelity", format!("{fidelity:.4}"));
    info!(fidelity, shots = config.shots, "teleportation finished");

    let mut report = TeleportReport {
        timestamp: Utc::now(),
        config: config.clone(),
        alice,
        postselected,
        bob,
        fidelity,
        files,
    };
    let path = write_json(&report, dir.join("teleport_report.json"))?;
    report.files.push(path);

    print_section("Output");
    print_written(&report.files);
    print_success(&format!("Teleportation fidelity {fidelity:.4}"));
    Ok(report)
}

/// Fidelity against feed-forward delay with Bob dephasing while he waits.
pub async fn run_dephasing_scenario(config: &ExperimentConfig) -> anyhow::Result<SweepReport> {
    let dir = &config.output_dir;
    let delays = config.dephasing.delays();

    print_section("Dephasing during feed-forward delay");
    print_result("T2", config.dephasing.t2);
    print_result("Delays", delays.len());

    let pb = create_progress_bar(delays.len() as u64, "delays");
    let series = dephasing_sweep(config, |_| pb.inc(1)).await?;
    pb.finish_with_message("done");

    for point in &series.points {
        print_result(
            &format!("delay {:>7.1}", point.parameter),
            format!("F = {:.4}", point.fidelity),
        );
    }

    let files = vec![plot_dephasing_noise(&series, dir.join("dephasing_fidelity.svg"))?];
    finish_sweep(config, vec![series], files, "dephasing_sweep.json")
}

/// Bell-pair histograms at a fixed strength, then fidelity against noise
/// strength for every configured noise kind.
pub async fn run_bellpair_scenario(config: &ExperimentConfig) -> anyhow::Result<SweepReport> {
    let dir = &config.output_dir;
    let kinds = &config.bell_pair.kinds;
    let strengths = config.bell_pair.strengths();
    let mut files = Vec::new();

    print_section("Degraded Bell pairs");
    for (i, &kind) in kinds.iter().enumerate() {
        let seed = config.seed.map(|s| s.wrapping_add(RUN_SEED_STRIDE * i as u64));
        let counts = bell_pair_counts(
            kind,
            config.bell_pair.histogram_strength,
            config.bell_pair.histogram_shots,
            seed,
        )
        .await?;
        print_info(&format!(
            "{} (p = {})",
            kind.label(),
            config.bell_pair.histogram_strength
        ));
        println!("{}", render::terminal::counts_bar_chart(&counts, 30));
        files.push(plot_counts(
            &counts,
            dir.join(format!("Bell_pair_{}.svg", kind.label().replace(' ', "_"))),
            &format!("Bell pair with {} noise", kind.label()),
        )?);
    }

    print_section("Fidelity against Bell-pair noise");
    let pb = create_progress_bar((kinds.len() * strengths.len()) as u64, "noise points");
    let mut series = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        series.push(bellpair_noise_sweep(config, kind, |_| pb.inc(1)).await?);
    }
    pb.finish_with_message("done");

    for s in &series {
        let summary: Vec<String> = s.fidelities().iter().map(|f| format!("{f:.3}")).collect();
        print_result(&s.label, summary.join(" "));
    }

    files.push(plot_bellpair_noise(&series, dir.join("bellpair_noise_fidelity.svg"))?);
    finish_sweep(config, series, files, "bellpair_noise_sweep.json")
}

fn finish_sweep(
    config: &ExperimentConfig,
    series: Vec<SweepSeries>,
    mut files: Vec<PathBuf>,
    report_name: &str,
) -> anyhow::Result<SweepReport> {
    let mut report = SweepReport {
        timestamp: Utc::now(),
        config: config.clone(),
        series,
        files: Vec::new(),
    };
    files.push(config.output_dir.join(report_name));
    report.files = files;
    write_json(&report, config.output_dir.join(report_name))?;

    print_section("Output");
    print_written(&report.files);
    print_success("Sweep finished");
    Ok(report)
}
