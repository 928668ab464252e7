//! In-memory correlator measurements indexed by time slice and configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, MeffError};

fn dataset_error(code: &str, message: impl Into<String>) -> MeffError {
    MeffError::Ingestion(ErrorInfo::new(code, message))
}

#[derive(Deserialize)]
struct RawDataset {
    slices: Vec<Vec<f64>>,
}

impl TryFrom<RawDataset> for CorrelatorDataset {
    type Error = MeffError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        CorrelatorDataset::from_slices(raw.slices)
    }
}

/// Per-time-slice measurements of a correlator across an ensemble.
///
/// `slices[t][i]` is the value of configuration `i` at time slice `t`. Every
/// slice holds the same number of entries and entry `i` of every slice comes
/// from the same configuration. Values are finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct CorrelatorDataset {
    slices: Vec<Vec<f64>>,
}

impl CorrelatorDataset {
    /// Builds a dataset from slice-major data, validating the shape.
    pub fn from_slices(slices: Vec<Vec<f64>>) -> Result<Self, MeffError> {
        let Some(first) = slices.first() else {
            return Err(dataset_error(
                "empty-dataset",
                "a dataset requires at least one time slice",
            ));
        };
        let configurations = first.len();
        if configurations == 0 {
            return Err(dataset_error("no-usable-data", "no usable data")
                .with_context("time_slices", slices.len()));
        }
        for (t, slice) in slices.iter().enumerate() {
            if slice.len() != configurations {
                return Err(MeffError::Ingestion(
                    ErrorInfo::new(
                        "ragged-dataset",
                        "all time slices must hold one value per configuration",
                    )
                    .with_context("time_slice", t)
                    .with_context("expected", configurations)
                    .with_context("found", slice.len()),
                ));
            }
            if let Some(idx) = slice.iter().position(|value| !value.is_finite()) {
                return Err(MeffError::Ingestion(
                    ErrorInfo::new("non-finite-value", "dataset values must be finite")
                        .with_context("time_slice", t)
                        .with_context("configuration", idx),
                ));
            }
        }
        Ok(Self { slices })
    }

    /// Builds a dataset from configuration-major rows (one row per source).
    ///
    /// Every row must contain exactly `time_slices` values.
    pub fn from_configurations(
        time_slices: usize,
        configurations: &[Vec<f64>],
    ) -> Result<Self, MeffError> {
        if time_slices == 0 {
            return Err(MeffError::Configuration(ErrorInfo::new(
                "zero-time-slices",
                "the time extent must be positive",
            )));
        }
        if configurations.is_empty() {
            return Err(dataset_error("no-usable-data", "no usable data"));
        }
        let mut slices = vec![Vec::with_capacity(configurations.len()); time_slices];
        for (idx, row) in configurations.iter().enumerate() {
            if row.len() != time_slices {
                return Err(MeffError::Ingestion(
                    ErrorInfo::new(
                        "length-mismatch",
                        "configuration does not provide one value per time slice",
                    )
                    .with_context("configuration", idx)
                    .with_context("expected", time_slices)
                    .with_context("found", row.len()),
                ));
            }
            for (slice, value) in slices.iter_mut().zip(row.iter()) {
                slice.push(*value);
            }
        }
        Self::from_slices(slices)
    }

    /// Number of time slices `T`.
    pub fn time_slices(&self) -> usize {
        self.slices.len()
    }

    /// Number of configurations `N`.
    pub fn configurations(&self) -> usize {
        self.slices.first().map(Vec::len).unwrap_or(0)
    }

    /// Values of every configuration at time slice `t`.
    pub fn slice(&self, t: usize) -> Option<&[f64]> {
        self.slices.get(t).map(Vec::as_slice)
    }

    /// All slices in time order.
    pub fn slices(&self) -> &[Vec<f64>] {
        &self.slices
    }

    /// The full time series of a single configuration.
    pub fn configuration(&self, idx: usize) -> Option<Vec<f64>> {
        if idx >= self.configurations() {
            return None;
        }
        Some(self.slices.iter().map(|slice| slice[idx]).collect())
    }

    /// Consumes the dataset returning the slice-major values.
    pub fn into_slices(self) -> Vec<Vec<f64>> {
        self.slices
    }
}
