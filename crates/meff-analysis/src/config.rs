use std::fs;
use std::path::Path;

use meff_core::errors::{ErrorInfo, MeffError};
use serde::{Deserialize, Serialize};

use crate::fold::folded_len;
use crate::plateau::PlateauRange;
use crate::serde::from_yaml_slice;

fn config_error(code: &str, message: impl Into<String>) -> MeffError {
    MeffError::Configuration(ErrorInfo::new(code, message))
}

fn default_time_slices() -> usize {
    64
}

fn default_fold() -> bool {
    true
}

/// Parameters of one effective-mass analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Total time extent `T` of the raw correlator.
    #[serde(default = "default_time_slices")]
    pub time_slices: usize,
    /// Average `C(t)` with `C(T - t)` before resampling.
    #[serde(default = "default_fold")]
    pub fold: bool,
    /// First effective-mass pair included in the plateau fit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plateau_low: Option<usize>,
    /// Last effective-mass pair included in the plateau fit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plateau_high: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            time_slices: default_time_slices(),
            fold: default_fold(),
            plateau_low: None,
            plateau_high: None,
        }
    }
}

impl AnalysisConfig {
    /// Loads a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, MeffError> {
        let bytes = fs::read(path).map_err(|err| {
            MeffError::Serde(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        from_yaml_slice(&bytes)
    }

    /// Sets both plateau bounds.
    pub fn with_plateau(mut self, low: usize, high: usize) -> Self {
        self.plateau_low = Some(low);
        self.plateau_high = Some(high);
        self
    }

    /// Number of slices entering the resampler (`T/2 + 1` when folding).
    pub fn analysed_slices(&self) -> usize {
        if self.fold {
            folded_len(self.time_slices)
        } else {
            self.time_slices
        }
    }

    /// The plateau range, if one was configured.
    pub fn plateau(&self) -> Result<Option<PlateauRange>, MeffError> {
        match (self.plateau_low, self.plateau_high) {
            (Some(low), Some(high)) => Ok(Some(PlateauRange::new(low, high))),
            (None, None) => Ok(None),
            _ => Err(config_error(
                "partial-plateau",
                "plateau_low and plateau_high must be given together",
            )),
        }
    }

    /// Rejects invalid parameters before any computation starts.
    pub fn validate(&self) -> Result<(), MeffError> {
        if self.time_slices < 2 || self.time_slices % 2 != 0 {
            return Err(config_error(
                "odd-time-extent",
                "the time extent must be an even number of at least 2",
            )
            .with_context("time_slices", self.time_slices));
        }
        if let Some(range) = self.plateau()? {
            range.validate(self.analysed_slices() - 1)?;
        }
        Ok(())
    }
}
