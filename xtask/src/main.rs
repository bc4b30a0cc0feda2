// Desktop/tooling crate — unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(missing_docs)]

mod bench;
mod check;
mod flash;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "CCA test-jig development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a jig image and flash it via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
        /// Which jig binary to flash
        #[arg(long, default_value = "interface-jig")]
        bin: String,
    },
    /// Check the workspace for both hardware and host targets
    Check,
    /// Run all tests (unit and integration)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// List serial ports that look like a jig console
    Ports,
    /// Query a jig's identity block over its serial console
    Probe {
        /// Serial port device, e.g. /dev/ttyACM0
        #[arg(long)]
        port: String,
        /// Console baud rate
        #[arg(long, default_value_t = 115_200)]
        baud: u32,
    },
    /// Run the keyword-command smoke sequence against a connected jig
    Exercise {
        /// Serial port device, e.g. /dev/ttyACM0
        #[arg(long)]
        port: String,
        /// Console baud rate
        #[arg(long, default_value_t = 115_200)]
        baud: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release, bin } => flash::run(release, &bin),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Ports => bench::list_ports(),
        Commands::Probe { port, baud } => bench::probe(&port, baud),
        Commands::Exercise { port, baud } => bench::exercise(&port, baud),
    }
}
