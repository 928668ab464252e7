use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use meff_analysis::{compare_folding, write_json};

use super::analyze::{ingest, load_config, write_run_artifacts, AnalysisOverrides, SelectionArgs};

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Zip archive or directory holding one file per configuration.
    #[arg(long)]
    pub source: PathBuf,
    /// YAML analysis configuration; its `fold` setting is ignored.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub overrides: AnalysisOverrides,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Output directory; the two runs land in `unfolded/` and `folded/`.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &CompareArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_deref(), &args.overrides)?;
    let opts = args.selection.ingest_options(config.time_slices);
    let (source, ingested) = ingest(&args.source, &opts)?;
    let comparison = compare_folding(
        &ingested.dataset,
        &config,
        &source.label(),
        ingested.rejected.len(),
    )?;

    write_run_artifacts(&args.out.join("unfolded"), &comparison.unfolded, &ingested.rejected)?;
    write_run_artifacts(&args.out.join("folded"), &comparison.folded, &[])?;
    write_json(&args.out.join("folding_comparison.json"), &comparison.effective_mass)?;

    println!("{:>4} {:>12} {:>12} {:>12} {:>8}", "t", "unfolded", "folded", "diff", "pull");
    for delta in &comparison.effective_mass {
        let pull = delta
            .pull
            .map(|pull| format!("{pull:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4} {:>12.6} {:>12.6} {:>12.2e} {:>8}",
            delta.time_slice, delta.baseline, delta.candidate, delta.difference, pull
        );
    }
    Ok(())
}
