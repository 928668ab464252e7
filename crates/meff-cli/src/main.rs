use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    analyze::{self, AnalyzeArgs},
    batch::{self, BatchArgs},
    compare::{self, CompareArgs},
    demo::{self, DemoArgs},
    version::{self, VersionArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "meff", about = "Jackknife effective-mass analysis of correlator ensembles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a configuration source and extract the effective mass.
    Analyze(AnalyzeArgs),
    /// Run the same source folded and unfolded and tabulate the differences.
    Compare(CompareArgs),
    /// Run one analysis per job of a YAML batch plan.
    Batch(BatchArgs),
    /// Write a synthetic ensemble in the configuration file format.
    Demo(DemoArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => analyze::run(&args),
        Command::Compare(args) => compare::run(&args),
        Command::Batch(args) => batch::run(&args),
        Command::Demo(args) => demo::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
