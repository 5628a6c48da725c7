//! Figures for teleportation experiments.
//!
//! Everything is written as standalone SVG. The helpers in this module
//! produce the standard set of figures; the submodules expose the building
//! blocks.

pub mod bloch;
pub mod circuit;
pub mod plot;
pub mod svg;
pub mod terminal;

use std::path::{Path, PathBuf};

use qrelay_hal::Counts;
use qrelay_ir::Circuit;
use tracing::debug;

use crate::density::{BlochVector, DensityMatrix};
use crate::error::TeleportResult;
use crate::sweep::SweepSeries;
use crate::tomography::{BasisCounts, MeasurementBasis};

pub use bloch::bloch_sphere;
pub use circuit::circuit_diagram;
pub use plot::{PlotOptions, PlotSeries, histogram, line_plot};
pub use svg::SvgDocument;

fn save(doc: &SvgDocument, path: &Path) -> TeleportResult<PathBuf> {
    doc.save(path)?;
    debug!(path = %path.display(), "wrote figure");
    Ok(path.to_path_buf())
}

/// Draw `circuit` to `path`.
pub fn plot_circuit(
    circuit: &Circuit,
    path: impl AsRef<Path>,
    title: &str,
) -> TeleportResult<PathBuf> {
    save(&circuit_diagram(circuit, title), path.as_ref())
}

/// Draw a Bloch sphere for `r` to `path`.
pub fn plot_bloch_state(
    r: BlochVector,
    path: impl AsRef<Path>,
    title: &str,
) -> TeleportResult<PathBuf> {
    save(&bloch_sphere(r, title), path.as_ref())
}

/// One Bloch sphere per post-selected Bell outcome, written as
/// `bob_bloch_post_{outcome}.svg` under `dir`.
pub fn plot_postselected_bob_blochs(
    states: &[(String, DensityMatrix)],
    dir: impl AsRef<Path>,
) -> TeleportResult<Vec<PathBuf>> {
    states
        .iter()
        .map(|(outcome, rho)| {
            plot_bloch_state(
                rho.bloch_vector(),
                dir.as_ref().join(format!("bob_bloch_post_{outcome}.svg")),
                &format!("Bob's Bloch - Postselected {outcome}"),
            )
        })
        .collect()
}

/// Histogram of Bob's read-out in each basis, written as
/// `{prefix}_{basis}.svg` under `dir`.
pub fn plot_bob_histograms(
    counts: &BasisCounts,
    dir: impl AsRef<Path>,
    prefix: &str,
) -> TeleportResult<Vec<PathBuf>> {
    MeasurementBasis::ALL
        .iter()
        .map(|&basis| {
            let doc = histogram(
                &counts.get(basis).to_counts(),
                &format!("Bob's qubit - {basis} basis"),
            );
            save(&doc, &dir.as_ref().join(format!("{prefix}_{basis}.svg")))
        })
        .collect()
}

/// Raw outcome histogram.
pub fn plot_counts(
    counts: &Counts,
    path: impl AsRef<Path>,
    title: &str,
) -> TeleportResult<PathBuf> {
    save(&histogram(counts, title), path.as_ref())
}

/// Fidelity against feed-forward delay.
pub fn plot_dephasing_noise(
    series: &SweepSeries,
    path: impl AsRef<Path>,
) -> TeleportResult<PathBuf> {
    let options = PlotOptions {
        title: "Effect of dephasing noise during feed-forward delay".into(),
        x_label: "Feed-forward delay".into(),
        y_label: "Teleportation fidelity".into(),
        y_range: Some((0.0, 1.05)),
        legend: false,
    };
    let data = PlotSeries::new(&series.label, &series.parameters(), &series.fidelities());
    save(&line_plot(&[data], &options), path.as_ref())
}

/// Fidelity against Bell-pair noise strength, one line per noise kind.
pub fn plot_bellpair_noise(
    series: &[SweepSeries],
    path: impl AsRef<Path>,
) -> TeleportResult<PathBuf> {
    let options = PlotOptions {
        title: "Effect of Bell-pair + input noise on teleportation fidelity".into(),
        x_label: "Noise strength p on Bell pair + input qubit".into(),
        y_label: "Teleportation fidelity".into(),
        y_range: Some((0.0, 1.05)),
        legend: true,
    };
    let data: Vec<_> = series
        .iter()
        .map(|s| PlotSeries::new(&s.label, &s.parameters(), &s.fidelities()))
        .collect();
    save(&line_plot(&data, &options), path.as_ref())
}
