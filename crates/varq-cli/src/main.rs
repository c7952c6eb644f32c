//! Varq Command-Line Interface
//!
//! Inspects molecule Hamiltonians: exact ground-state energies and the
//! measurement plan a variational run would use.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{config, exact, groups, version};

#[derive(Parser)]
#[command(name = "varq")]
#[command(author, version, about = "Variational ground-state estimation toolkit")]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file (VARQ_* environment variables take precedence)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagonalize a molecule Hamiltonian exactly
    Exact {
        /// Molecule JSON document
        molecule: PathBuf,

        /// Largest qubit count to diagonalize (overrides the configuration)
        #[arg(long)]
        max_qubits: Option<usize>,
    },

    /// Show how a molecule's terms are grouped into measurement bases
    Groups {
        /// Molecule JSON document
        molecule: PathBuf,

        /// Grouping strategy (greedy, individual)
        #[arg(short, long, default_value = "greedy")]
        strategy: String,
    },

    /// Print the resolved run configuration
    Config,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Exact {
            molecule,
            max_qubits,
        } => exact::execute(&molecule, max_qubits, cli.config.as_deref()),

        Commands::Groups { molecule, strategy } => groups::execute(&molecule, &strategy),

        Commands::Config => config::execute(cli.config.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
