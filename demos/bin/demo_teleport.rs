//! Quantum Teleportation Demo
//!
//! Teleports a prepared qubit from Alice to Bob and reconstructs Bob's state
//! by single-qubit tomography, before and after feed-forward.

use clap::Parser;
use qrelay_demos::scenarios::run_teleport_scenario;
use qrelay_demos::{CommonArgs, init_tracing, print_header, print_info};

#[derive(Parser, Debug)]
#[command(name = "demo-teleport")]
#[command(about = "Teleport a qubit and reconstruct Bob's state")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Polar angle of the input state
    #[arg(long)]
    theta: Option<f64>,

    /// Azimuthal angle of the input state
    #[arg(long)]
    phi: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.common.verbose);

    let mut config = args.common.load_config()?;
    if let Some(theta) = args.theta {
        config.theta = theta;
    }
    if let Some(phi) = args.phi {
        config.phi = phi;
    }
    config.validate()?;

    print_header("Quantum Teleportation");
    print_info(&format!(
        "{} shots per basis, figures in {}",
        config.shots,
        config.output_dir.display()
    ));

    run_teleport_scenario(&config).await?;
    Ok(())
}
