use meff_core::errors::{ErrorInfo, MeffError};
use meff_core::{CorrelatorDataset, RunProvenance, SchemaVersion};

use crate::config::AnalysisConfig;
use crate::effmass::{log_ratio_series, EffectiveMassSeries};
use crate::fold::fold;
use crate::hash::{dataset_hash, stable_hash_string};
use crate::jackknife::{bin_means, estimate, jackknife_error, Estimate};
use crate::plateau::{fit_plateau, PlateauFit};
use crate::report::{AnalysisReport, PlateauSummary, SeriesPoint};

/// Intermediate products of a run, kept for callers that need the bins.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// `bin_means[t][i]`: mean of slice `t` without configuration `i`.
    pub bin_means: Vec<Vec<f64>>,
    /// Jackknife estimate of the correlator at each analysed slice.
    pub correlator: Vec<Estimate>,
    /// Log-ratio estimator per pair and bin.
    pub series: EffectiveMassSeries,
    /// Jackknife error of the effective mass at each pair.
    pub errors: Vec<f64>,
    /// Plateau fit, when configured.
    pub plateau: Option<PlateauFit>,
}

/// Jackknife bin means for every slice, tagging failures with the slice index.
pub fn resample_slices(dataset: &CorrelatorDataset) -> Result<Vec<Vec<f64>>, MeffError> {
    dataset
        .slices()
        .iter()
        .enumerate()
        .map(|(t, values)| bin_means(values).map_err(|err| err.with_context("time_slice", t)))
        .collect()
}

/// Effective-mass error per pair, each against the mean of its own bins.
pub fn effective_mass_errors(series: &EffectiveMassSeries) -> Result<Vec<f64>, MeffError> {
    series
        .per_bin
        .iter()
        .zip(series.central.iter())
        .enumerate()
        .map(|(t, (bins, central))| {
            jackknife_error(bins, *central).map_err(|err| err.with_context("time_slice", t))
        })
        .collect()
}

/// Runs fold → resample → log-ratio → error → plateau and keeps every stage.
pub fn run_pipeline(
    dataset: &CorrelatorDataset,
    config: &AnalysisConfig,
) -> Result<PipelineOutput, MeffError> {
    config.validate()?;
    let folded;
    let working = if config.fold {
        folded = fold(dataset, config.time_slices)?;
        &folded
    } else {
        if dataset.time_slices() != config.time_slices {
            return Err(MeffError::Configuration(
                ErrorInfo::new(
                    "time-extent-mismatch",
                    "dataset time extent differs from the configured extent",
                )
                .with_context("time_slices", config.time_slices)
                .with_context("dataset_time_slices", dataset.time_slices()),
            ));
        }
        dataset
    };
    log::info!(
        "analysing {} slices x {} configurations (fold: {})",
        working.time_slices(),
        working.configurations(),
        config.fold
    );

    let bin_means = resample_slices(working)?;
    let correlator = bin_means
        .iter()
        .enumerate()
        .map(|(t, bins)| estimate(bins).map_err(|err| err.with_context("time_slice", t)))
        .collect::<Result<Vec<_>, _>>()?;
    let series = log_ratio_series(&bin_means)?;
    let errors = effective_mass_errors(&series)?;
    for (t, (value, error)) in series.central.iter().zip(errors.iter()).enumerate() {
        log::debug!("m_eff({t}) = {value:.6} +/- {error:.6}");
    }
    let plateau = match config.plateau()? {
        Some(range) => Some(fit_plateau(range.low, range.high, &errors, &series.per_bin)?),
        None => None,
    };

    Ok(PipelineOutput {
        bin_means,
        correlator,
        series,
        errors,
        plateau,
    })
}

/// Runs the pipeline on an in-memory dataset.
pub fn analyze(
    dataset: &CorrelatorDataset,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, MeffError> {
    analyze_with_source(dataset, config, "memory", 0)
}

/// Runs the pipeline and records the data source and ingestion losses.
pub fn analyze_with_source(
    dataset: &CorrelatorDataset,
    config: &AnalysisConfig,
    source: &str,
    rejected: usize,
) -> Result<AnalysisReport, MeffError> {
    let output = run_pipeline(dataset, config)?;
    let provenance = RunProvenance::new(dataset_hash(dataset)?, source)
        .with_counts(dataset.configurations(), rejected);
    build_report(dataset.configurations(), config, provenance, &output)
}

fn build_report(
    configurations: usize,
    config: &AnalysisConfig,
    mut provenance: RunProvenance,
    output: &PipelineOutput,
) -> Result<AnalysisReport, MeffError> {
    provenance.tool_versions.insert(
        "meff-analysis".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    let correlator = output
        .correlator
        .iter()
        .enumerate()
        .map(|(t, estimate)| SeriesPoint::from_estimate(t, *estimate))
        .collect();
    let effective_mass = output
        .series
        .central
        .iter()
        .zip(output.errors.iter())
        .enumerate()
        .map(|(t, (value, error))| SeriesPoint {
            time_slice: t,
            value: *value,
            error: *error,
        })
        .collect();
    let mut report = AnalysisReport {
        schema_version: SchemaVersion::default(),
        provenance,
        config: config.clone(),
        configurations,
        analysed_slices: output.bin_means.len(),
        correlator,
        effective_mass,
        plateau: output.plateau.as_ref().map(PlateauSummary::from),
        report_hash: String::new(),
    };
    report.report_hash = stable_hash_string(&report)?;
    Ok(report)
}
