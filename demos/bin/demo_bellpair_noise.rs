//! Bell-pair Noise Demo
//!
//! Degrades the shared Bell pair with depolarizing or amplitude-damping
//! noise and plots the teleportation fidelity against noise strength.

use clap::Parser;
use qrelay_demos::scenarios::run_bellpair_scenario;
use qrelay_demos::{CommonArgs, init_tracing, print_header};
use qrelay_teleport::BellPairNoise;

#[derive(Parser, Debug)]
#[command(name = "demo-bellpair-noise")]
#[command(about = "Teleportation fidelity against Bell-pair noise")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Noise kinds to sweep (depolarizing, amplitude_damping)
    #[arg(short, long, value_delimiter = ',')]
    kinds: Vec<BellPairNoise>,

    /// Number of noise strengths
    #[arg(long)]
    points: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.common.verbose);

    let mut config = args.common.load_config()?;
    if !args.kinds.is_empty() {
        config.bell_pair.kinds = args.kinds;
    }
    if let Some(points) = args.points {
        config.bell_pair.points = points;
    }
    config.validate()?;

    print_header("Bell-pair Noise");
    run_bellpair_scenario(&config).await?;
    Ok(())
}
