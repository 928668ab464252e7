//! Side-by-side comparisons of effective-mass series.

use std::collections::BTreeMap;

use meff_core::errors::MeffError;
use meff_core::CorrelatorDataset;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::pipeline::analyze_with_source;
use crate::report::{AnalysisReport, SeriesPoint};

/// Difference between two estimates at one time slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesDelta {
    /// Time slice of the compared points.
    pub time_slice: usize,
    /// Value from the baseline series.
    pub baseline: f64,
    /// Value from the candidate series.
    pub candidate: f64,
    /// `candidate - baseline`.
    pub difference: f64,
    /// Difference in units of the combined error; absent when both errors vanish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull: Option<f64>,
}

impl SeriesDelta {
    fn between(baseline: &SeriesPoint, candidate: &SeriesPoint) -> Self {
        let difference = candidate.value - baseline.value;
        let combined = baseline.error.hypot(candidate.error);
        Self {
            time_slice: baseline.time_slice,
            baseline: baseline.value,
            candidate: candidate.value,
            difference,
            pull: (combined > 0.0).then(|| difference / combined),
        }
    }
}

/// Unfolded and folded runs of the same dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldingComparison {
    /// Run on all `T` slices.
    pub unfolded: AnalysisReport,
    /// Run on the `T/2 + 1` folded slices.
    pub folded: AnalysisReport,
    /// Per-pair deltas over the shared range (folded minus unfolded).
    pub effective_mass: Vec<SeriesDelta>,
}

/// Runs the pipeline with and without folding and lines the results up.
///
/// The plateau range in `config` must be valid for the folded run, which
/// makes it valid for the unfolded run as well.
pub fn compare_folding(
    dataset: &CorrelatorDataset,
    config: &AnalysisConfig,
    source: &str,
    rejected: usize,
) -> Result<FoldingComparison, MeffError> {
    let folded_config = AnalysisConfig {
        fold: true,
        ..config.clone()
    };
    folded_config.validate()?;
    let unfolded_config = AnalysisConfig {
        fold: false,
        ..config.clone()
    };
    let unfolded = analyze_with_source(dataset, &unfolded_config, source, rejected)?;
    let folded = analyze_with_source(dataset, &folded_config, source, rejected)?;
    let effective_mass = unfolded
        .effective_mass
        .iter()
        .zip(folded.effective_mass.iter())
        .map(|(base, cand)| SeriesDelta::between(base, cand))
        .collect();
    Ok(FoldingComparison {
        unfolded,
        folded,
        effective_mass,
    })
}

/// Computed series checked against an externally supplied one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceComparison {
    /// Deltas (computed minus reference) for every shared time slice.
    pub deltas: Vec<SeriesDelta>,
    /// Reference slices with no computed counterpart.
    pub missing_in_series: Vec<usize>,
    /// Computed slices with no reference counterpart.
    pub missing_in_reference: Vec<usize>,
    /// Largest absolute pull among the matched slices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_abs_pull: Option<f64>,
}

/// Matches `series` against `reference` by time slice.
pub fn compare_reference(series: &[SeriesPoint], reference: &[SeriesPoint]) -> ReferenceComparison {
    let computed: BTreeMap<usize, &SeriesPoint> =
        series.iter().map(|point| (point.time_slice, point)).collect();
    let expected: BTreeMap<usize, &SeriesPoint> = reference
        .iter()
        .map(|point| (point.time_slice, point))
        .collect();

    let deltas: Vec<SeriesDelta> = expected
        .iter()
        .filter_map(|(t, reference)| {
            computed
                .get(t)
                .map(|point| SeriesDelta::between(reference, point))
        })
        .collect();
    let missing_in_series = expected
        .keys()
        .filter(|t| !computed.contains_key(t))
        .copied()
        .collect();
    let missing_in_reference = computed
        .keys()
        .filter(|t| !expected.contains_key(t))
        .copied()
        .collect();
    let max_abs_pull = deltas
        .iter()
        .filter_map(|delta| delta.pull.map(f64::abs))
        .fold(None, |acc: Option<f64>, pull| {
            Some(acc.map_or(pull, |best| best.max(pull)))
        });
    ReferenceComparison {
        deltas,
        missing_in_series,
        missing_in_reference,
        max_abs_pull,
    }
}
