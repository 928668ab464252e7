use meff_core::{RunProvenance, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::jackknife::Estimate;
use crate::plateau::{PlateauFit, PlateauRange};

/// One `(time slice, value, error)` triple handed to plotting collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Time slice (or lower slice of an adjacent pair).
    pub time_slice: usize,
    /// Central value.
    pub value: f64,
    /// Jackknife error.
    pub error: f64,
}

impl SeriesPoint {
    pub(crate) fn from_estimate(time_slice: usize, estimate: Estimate) -> Self {
        Self {
            time_slice,
            value: estimate.value,
            error: estimate.error,
        }
    }
}

/// Plateau result as recorded in a report (bin values omitted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateauSummary {
    /// Fitted range of effective-mass pairs.
    pub range: PlateauRange,
    /// Fitted energy.
    pub value: f64,
    /// Jackknife error of the fitted energy.
    pub error: f64,
    /// Share of the weight carried by each pair in the range.
    pub weight_fractions: Vec<f64>,
}

impl From<&PlateauFit> for PlateauSummary {
    fn from(fit: &PlateauFit) -> Self {
        Self {
            range: fit.range,
            value: fit.value,
            error: fit.error,
            weight_fractions: fit.weight_fractions.clone(),
        }
    }
}

/// Complete output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version of the report payload.
    pub schema_version: SchemaVersion,
    /// Where the measurements came from.
    pub provenance: RunProvenance,
    /// Parameters of the run.
    pub config: AnalysisConfig,
    /// Number of configurations (and jackknife bins).
    pub configurations: usize,
    /// Number of slices after optional folding.
    pub analysed_slices: usize,
    /// Jackknife mean and error of the correlator at each analysed slice.
    pub correlator: Vec<SeriesPoint>,
    /// Effective mass and error for each adjacent pair `(t, t + 1)`.
    pub effective_mass: Vec<SeriesPoint>,
    /// Plateau fit, when a range was configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plateau: Option<PlateauSummary>,
    /// Canonical hash of the report with this field empty.
    pub report_hash: String,
}
