//! Feed-forward Delay Demo
//!
//! Sweeps the time Bob waits for Alice's classical bits while his qubit
//! dephases, and plots the teleportation fidelity.

use clap::Parser;
use qrelay_demos::scenarios::run_dephasing_scenario;
use qrelay_demos::{CommonArgs, init_tracing, print_header};

#[derive(Parser, Debug)]
#[command(name = "demo-dephasing")]
#[command(about = "Teleportation fidelity against feed-forward delay")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Dephasing time T2
    #[arg(long)]
    t2: Option<f64>,

    /// Longest delay in the sweep
    #[arg(long)]
    max_delay: Option<f64>,

    /// Number of delays
    #[arg(long)]
    points: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.common.verbose);

    let mut config = args.common.load_config()?;
    if let Some(t2) = args.t2 {
        config.dephasing.t2 = t2;
    }
    if let Some(max_delay) = args.max_delay {
        config.dephasing.max_delay = max_delay;
    }
    if let Some(points) = args.points {
        config.dephasing.points = points;
    }
    config.validate()?;

    print_header("Dephasing During Feed-forward");
    run_dephasing_scenario(&config).await?;
    Ok(())
}
