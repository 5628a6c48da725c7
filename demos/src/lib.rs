//! qrelay Demo Suite
//!
//! Runnable teleportation experiments on the local simulator:
//!
//! - **Teleport**: state preparation, post-selected Bob states, feed-forward
//!   and final tomography with figures for every step
//! - **Dephasing**: fidelity while Bob waits for Alice's bits
//! - **Bell-pair noise**: fidelity through a degraded entangled pair
//!
//! Each binary accepts the same [`CommonArgs`]. Settings are merged from a
//! config file, then `QRELAY_*` environment variables, then flags.

pub mod scenarios;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use qrelay_teleport::ExperimentConfig;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Options shared by every demo binary.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Experiment config file (YAML or JSON)
    #[arg(short, long, env = "QRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Shots per circuit
    #[arg(short, long)]
    pub shots: Option<u32>,

    /// Base simulator seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for figures and reports
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CommonArgs {
    /// Build the effective experiment config.
    pub fn load_config(&self) -> anyhow::Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ExperimentConfig::default(),
        }
        .with_env_overrides();

        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Install the tracing subscriber for `-v` count `verbose`.
pub fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // A subscriber may already be set when demos run inside tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .try_init();
}

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let template = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(template.progress_chars("#>-"));
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print the paths of written files.
pub fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("  {} {}", style("→").dim(), path.display());
    }
}
