use meff_core::errors::{ErrorInfo, MeffError};
use serde::{Deserialize, Serialize};

use crate::jackknife::{insufficient, jackknife_error, mean};

fn range_error(code: &str, message: &str, range: PlateauRange) -> MeffError {
    MeffError::Configuration(
        ErrorInfo::new(code, message)
            .with_context("low", range.low)
            .with_context("high", range.high),
    )
}

/// Inclusive range of effective-mass pairs over which a constant is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateauRange {
    /// First pair index included in the fit.
    pub low: usize,
    /// Last pair index included in the fit.
    pub high: usize,
}

impl PlateauRange {
    /// Creates a range without validating it.
    pub fn new(low: usize, high: usize) -> Self {
        Self { low, high }
    }

    /// Number of pairs covered by the range.
    pub fn len(&self) -> usize {
        self.high.saturating_sub(self.low) + 1
    }

    /// Checks `low <= high <= pairs - 1`.
    pub fn validate(&self, pairs: usize) -> Result<(), MeffError> {
        if self.low > self.high {
            return Err(range_error(
                "inverted-plateau",
                "plateau lower bound exceeds the upper bound",
                *self,
            ));
        }
        if self.high >= pairs {
            return Err(range_error(
                "plateau-out-of-range",
                "plateau range exceeds the available effective-mass pairs",
                *self,
            )
            .with_context("pairs", pairs));
        }
        Ok(())
    }
}

/// Result of an inverse-variance weighted constant fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateauFit {
    /// Range that was fitted.
    pub range: PlateauRange,
    /// Fitted constant for each jackknife bin.
    pub bin_values: Vec<f64>,
    /// Mean of `bin_values`.
    pub value: f64,
    /// Jackknife error of `bin_values` around `value`.
    pub error: f64,
    /// Share of the total weight carried by each pair in the range.
    pub weight_fractions: Vec<f64>,
}

/// Inverse-variance weights for the pairs in `range`, scaled so the smallest
/// error gets weight one.
///
/// The scaling leaves every weighted mean unchanged and makes uniform errors
/// give weights of exactly one.
pub fn plateau_weights(range: PlateauRange, errors: &[f64]) -> Result<Vec<f64>, MeffError> {
    range.validate(errors.len())?;
    let window = &errors[range.low..=range.high];
    for (offset, error) in window.iter().enumerate() {
        if !error.is_finite() || *error <= 0.0 {
            return Err(MeffError::DomainMath(
                ErrorInfo::new(
                    "zero-error-weight",
                    "plateau weights need a positive, finite error at every slice",
                )
                .with_context("time_slice", range.low + offset)
                .with_context("error", error),
            ));
        }
    }
    let smallest = window.iter().copied().fold(f64::INFINITY, f64::min);
    Ok(window
        .iter()
        .map(|error| {
            let ratio = smallest / error;
            ratio * ratio
        })
        .collect())
}

/// Fits a constant to `per_bin[t][i]` over `low..=high` for every bin `i`.
///
/// `errors[t]` is the jackknife error of the effective mass at pair `t`. The
/// weights are computed once and shared across bins.
pub fn fit_plateau(
    low: usize,
    high: usize,
    errors: &[f64],
    per_bin: &[Vec<f64>],
) -> Result<PlateauFit, MeffError> {
    let range = PlateauRange::new(low, high);
    if errors.len() != per_bin.len() {
        return Err(range_error(
            "misaligned-errors",
            "one error is required per effective-mass pair",
            range,
        )
        .with_context("errors", errors.len())
        .with_context("pairs", per_bin.len()));
    }
    let weights = plateau_weights(range, errors)?;
    let rows = &per_bin[low..=high];
    let bins = rows[0].len();
    if bins < 2 {
        return Err(insufficient(bins).with_context("time_slice", low));
    }
    if let Some(offset) = rows.iter().position(|row| row.len() != bins) {
        return Err(MeffError::Configuration(
            ErrorInfo::new(
                "misaligned-bins",
                "every pair in the plateau must carry the same number of bins",
            )
            .with_context("time_slice", low + offset),
        ));
    }

    let total_weight = weights.iter().sum::<f64>();
    let bin_values: Vec<f64> = (0..bins)
        .map(|bin| {
            let weighted = rows
                .iter()
                .zip(weights.iter())
                .map(|(row, weight)| weight * row[bin])
                .sum::<f64>();
            weighted / total_weight
        })
        .collect();
    let value = mean(&bin_values);
    let error = jackknife_error(&bin_values, value)
        .map_err(|err| err.with_context("low", low).with_context("high", high))?;
    let weight_fractions = weights.iter().map(|weight| weight / total_weight).collect();
    log::info!(
        "plateau [{low}, {high}] over {bins} bins: {value:.6} +/- {error:.6}"
    );
    Ok(PlateauFit {
        range,
        bin_values,
        value,
        error,
        weight_fractions,
    })
}
