use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use meff_analysis::{analyze_with_source, from_yaml_slice, write_json, AnalysisConfig, PlateauSummary};
use meff_core::{ErrorInfo, MeffError};
use meff_ingest::IngestOptions;
use serde::{Deserialize, Serialize};

use super::analyze::{ingest, print_plateau, write_run_artifacts};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// YAML batch plan.
    #[arg(long)]
    pub plan: PathBuf,
    /// Output directory; each job writes into `<out>/<label>/`.
    #[arg(long)]
    pub out: PathBuf,
}

/// Jobs sharing one set of analysis and ingestion defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPlan {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub ingest: IngestOptions,
    pub jobs: Vec<BatchJob>,
}

/// One source (typically one momentum) with its own plateau.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    pub label: String,
    /// Resolved against the plan file's directory when relative.
    pub source: PathBuf,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub fold: Option<bool>,
    #[serde(default)]
    pub plateau_low: Option<usize>,
    #[serde(default)]
    pub plateau_high: Option<usize>,
}

impl BatchJob {
    fn config(&self, defaults: &AnalysisConfig) -> AnalysisConfig {
        let mut config = defaults.clone();
        if let Some(fold) = self.fold {
            config.fold = fold;
        }
        if self.plateau_low.is_some() || self.plateau_high.is_some() {
            config.plateau_low = self.plateau_low;
            config.plateau_high = self.plateau_high;
        }
        config
    }

    fn ingest_options(&self, defaults: &IngestOptions, time_slices: usize) -> IngestOptions {
        let mut opts = defaults.clone();
        opts.time_slices = time_slices;
        if let Some(include) = &self.include {
            opts.include = include.clone();
        }
        if let Some(exclude) = &self.exclude {
            opts.exclude = exclude.clone();
        }
        opts
    }
}

impl BatchPlan {
    pub fn load(path: &Path) -> Result<Self, MeffError> {
        let bytes = fs::read(path).map_err(|err| {
            MeffError::Serde(
                ErrorInfo::new("plan-read", err.to_string()).with_context("path", path.display()),
            )
        })?;
        from_yaml_slice(&bytes)
    }

    /// Checks labels and every job's configuration before anything runs.
    pub fn validate(&self) -> Result<(), MeffError> {
        if self.jobs.is_empty() {
            return Err(MeffError::Configuration(ErrorInfo::new(
                "empty-plan",
                "the batch plan lists no jobs",
            )));
        }
        let mut labels = BTreeSet::new();
        for job in &self.jobs {
            let valid_label = !job.label.is_empty()
                && job
                    .label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
                && job.label != "."
                && job.label != "..";
            if !valid_label {
                return Err(MeffError::Configuration(
                    ErrorInfo::new("invalid-label", "labels name output directories")
                        .with_context("label", &job.label),
                ));
            }
            if !labels.insert(job.label.as_str()) {
                return Err(MeffError::Configuration(
                    ErrorInfo::new("duplicate-label", "job labels must be unique")
                        .with_context("label", &job.label),
                ));
            }
            job.config(&self.analysis)
                .validate()
                .map_err(|err| err.with_context("label", &job.label))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub label: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plateau: Option<PlateauSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<MeffError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub jobs: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn failures(&self) -> usize {
        self.jobs.iter().filter(|job| job.error.is_some()).count()
    }
}

fn run_job(plan: &BatchPlan, job: &BatchJob, base: &Path, out: &Path) -> BatchEntry {
    let source = base.join(&job.source);
    let mut entry = BatchEntry {
        label: job.label.clone(),
        source: source.display().to_string(),
        configurations: None,
        rejected: None,
        plateau: None,
        report_hash: None,
        error: None,
    };
    let config = job.config(&plan.analysis);
    let opts = job.ingest_options(&plan.ingest, config.time_slices);
    let outcome = ingest(&source, &opts).and_then(|(source, ingested)| {
        let report = analyze_with_source(
            &ingested.dataset,
            &config,
            &source.label(),
            ingested.rejected.len(),
        )?;
        write_run_artifacts(&out.join(&job.label), &report, &ingested.rejected)?;
        Ok((report, ingested.rejected.len()))
    });
    match outcome {
        Ok((report, rejected)) => {
            print_plateau(&job.label, &report);
            entry.configurations = Some(report.configurations);
            entry.rejected = Some(rejected);
            entry.plateau = report.plateau;
            entry.report_hash = Some(report.report_hash);
        }
        Err(err) => {
            log::error!("job {} failed: {err}", job.label);
            entry.error = Some(err);
        }
    }
    entry
}

/// Runs every job in plan order. A failing job is recorded and the batch moves on.
pub fn run_batch(plan: &BatchPlan, base: &Path, out: &Path) -> Result<BatchSummary, MeffError> {
    plan.validate()?;
    let jobs = plan
        .jobs
        .iter()
        .map(|job| run_job(plan, job, base, out))
        .collect();
    let summary = BatchSummary { jobs };
    write_json(&out.join("batch_summary.json"), &summary)?;
    Ok(summary)
}

pub fn run(args: &BatchArgs) -> Result<(), Box<dyn Error>> {
    let plan = BatchPlan::load(&args.plan)?;
    let base = args
        .plan
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    fs::create_dir_all(&args.out)?;
    let summary = run_batch(&plan, &base, &args.out)?;
    match summary.failures() {
        0 => Ok(()),
        failed => Err(format!("{failed} of {} batch jobs failed", summary.jobs.len()).into()),
    }
}
