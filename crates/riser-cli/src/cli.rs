use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Coaxial riser network designer", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Choose trunk splitter, floor taps and apartment splitters for a building
    Solve {
        /// Building description (.toml or .json)
        #[arg(long, value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Write the design and reports as JSON
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Solver time limit in seconds
        #[arg(long, default_value_t = 20.0)]
        time_limit: f64,
        /// Relative MIP gap at which the search stops
        #[arg(long, default_value_t = 0.05)]
        gap: f64,
        /// Threading hint (`auto` or integer)
        #[arg(long, default_value = "auto")]
        threads: String,
        /// Keep a design found before the time limit without proof of optimality
        #[arg(long)]
        accept_time_limited: bool,
        /// Output format for stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Load and validate a building description without solving
    Validate {
        /// Building description (.toml or .json)
        #[arg(long, value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },
    /// Show how floors split into riser blocks
    Partition {
        /// Number of floors
        #[arg(long)]
        floors: u32,
        /// Trunk splitter floor (defaults to mid-height)
        #[arg(long)]
        trunk_floor: Option<u32>,
    },
    /// Write a synthetic building description
    Generate {
        /// Number of floors
        #[arg(long)]
        floors: u32,
        /// Apartments per floor
        #[arg(long)]
        apartments: u32,
        /// Random seed
        #[arg(long, default_value_t = riser_algo::generator::DEFAULT_SEED)]
        seed: u64,
        /// Output path (.toml or .json)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
