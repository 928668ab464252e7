use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use meff_analysis::{
    analyze_with_source, compare_reference, read_series_csv, write_json, write_series_csv,
    AnalysisConfig, AnalysisReport,
};
use meff_core::{ErrorInfo, MeffError};
use meff_ingest::{ingest_source, DataSource, IngestOptions, IngestReport, RejectedEntry};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Zip archive or directory holding one file per configuration.
    #[arg(long)]
    pub source: PathBuf,
    /// YAML analysis configuration; flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub overrides: AnalysisOverrides,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Reference `time_slice,value,error` CSV to check the effective mass against.
    #[arg(long)]
    pub reference: Option<PathBuf>,
    /// Output directory for report and series files.
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisOverrides {
    /// Total time extent T of each configuration.
    #[arg(long)]
    pub time_slices: Option<usize>,
    /// Fold C(t) with C(T - t) before resampling.
    #[arg(long, conflicts_with = "no_fold")]
    pub fold: bool,
    /// Analyse all T slices without folding.
    #[arg(long)]
    pub no_fold: bool,
    /// First effective-mass pair of the plateau fit.
    #[arg(long)]
    pub plateau_low: Option<usize>,
    /// Last effective-mass pair of the plateau fit.
    #[arg(long)]
    pub plateau_high: Option<usize>,
}

impl AnalysisOverrides {
    pub fn apply(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(time_slices) = self.time_slices {
            config.time_slices = time_slices;
        }
        if self.fold {
            config.fold = true;
        }
        if self.no_fold {
            config.fold = false;
        }
        if self.plateau_low.is_some() {
            config.plateau_low = self.plateau_low;
        }
        if self.plateau_high.is_some() {
            config.plateau_high = self.plateau_high;
        }
        config
    }
}

#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Glob an entry must match (repeatable, default `**/*.dat`).
    #[arg(long = "include", value_name = "GLOB")]
    pub include: Vec<String>,
    /// Glob that excludes an entry (repeatable, default `**/__MACOSX/**`).
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,
    /// 0-based column holding the correlator value.
    #[arg(long, default_value_t = 4)]
    pub column: usize,
    /// Parser threads.
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
}

impl SelectionArgs {
    pub fn ingest_options(&self, time_slices: usize) -> IngestOptions {
        let mut opts = IngestOptions::with_time_slices(time_slices);
        if !self.include.is_empty() {
            opts.include = self.include.clone();
        }
        if !self.exclude.is_empty() {
            opts.exclude = self.exclude.clone();
        }
        opts.column = self.column;
        opts.threads = self.threads;
        opts
    }
}

pub fn load_config(
    path: Option<&Path>,
    overrides: &AnalysisOverrides,
) -> Result<AnalysisConfig, MeffError> {
    let base = match path {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    let config = overrides.apply(base);
    config.validate()?;
    Ok(config)
}

pub fn ingest(source: &Path, opts: &IngestOptions) -> Result<(DataSource, IngestReport), MeffError> {
    let source = DataSource::from_path(source);
    let report = ingest_source(&source, opts)?;
    Ok((source, report))
}

fn io_error(code: &str, err: impl ToString, path: &Path) -> MeffError {
    MeffError::Serde(ErrorInfo::new(code, err.to_string()).with_context("path", path.display()))
}

/// Writes `report.json`, the two series CSVs and, when entries were dropped, `rejected.json`.
pub fn write_run_artifacts(
    out: &Path,
    report: &AnalysisReport,
    rejected: &[RejectedEntry],
) -> Result<(), MeffError> {
    fs::create_dir_all(out).map_err(|err| io_error("out-dir", err, out))?;
    write_json(&out.join("report.json"), report)?;
    write_series_csv(&out.join("effmass.csv"), &report.effective_mass)?;
    write_series_csv(&out.join("correlator.csv"), &report.correlator)?;
    if !rejected.is_empty() {
        write_json(&out.join("rejected.json"), &rejected)?;
    }
    Ok(())
}

pub fn print_plateau(label: &str, report: &AnalysisReport) {
    match &report.plateau {
        Some(plateau) => println!(
            "{label}: E = {:.6} +/- {:.6} over pairs [{}, {}] ({} configurations)",
            plateau.value,
            plateau.error,
            plateau.range.low,
            plateau.range.high,
            report.configurations
        ),
        None => println!(
            "{label}: {} effective-mass pairs, no plateau range configured",
            report.effective_mass.len()
        ),
    }
}

pub fn run(args: &AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_deref(), &args.overrides)?;
    let opts = args.selection.ingest_options(config.time_slices);
    let (source, ingested) = ingest(&args.source, &opts)?;
    let report = analyze_with_source(
        &ingested.dataset,
        &config,
        &source.label(),
        ingested.rejected.len(),
    )?;
    write_run_artifacts(&args.out, &report, &ingested.rejected)?;

    if let Some(reference) = &args.reference {
        let points = read_series_csv(reference)?;
        let comparison = compare_reference(&report.effective_mass, &points);
        write_json(&args.out.join("reference_comparison.json"), &comparison)?;
        match comparison.max_abs_pull {
            Some(pull) => log::info!(
                "{} slices matched the reference, max |pull| = {pull:.3}",
                comparison.deltas.len()
            ),
            None => log::info!("{} slices matched the reference", comparison.deltas.len()),
        }
    }
    print_plateau(&source.label(), &report);
    Ok(())
}
