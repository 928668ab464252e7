//! Leave-one-out resampling and the jackknife standard error.

use meff_core::errors::{ErrorInfo, MeffError};
use serde::{Deserialize, Serialize};

pub(crate) fn insufficient(configurations: usize) -> MeffError {
    MeffError::InsufficientData(
        ErrorInfo::new(
            "too-few-configurations",
            "jackknife resampling requires at least two configurations",
        )
        .with_context("configurations", configurations)
        .with_hint("check how many configurations survived ingestion"),
    )
}

fn non_finite(what: &str) -> MeffError {
    MeffError::DomainMath(ErrorInfo::new(
        "non-finite-value",
        format!("{what} must be finite"),
    ))
}

/// Mean of a non-empty slice, accumulated as offsets from the first element.
///
/// A slice of identical values yields that value exactly.
pub(crate) fn mean(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty());
    let anchor = values[0];
    let offset = values.iter().map(|value| value - anchor).sum::<f64>();
    anchor + offset / values.len() as f64
}

/// Explicit leave-one-out bins for one time slice.
#[derive(Debug, Clone, PartialEq)]
pub struct JackknifeBins {
    /// `bins[i]` holds every value except configuration `i`.
    pub bins: Vec<Vec<f64>>,
    /// `means[i]` is the mean of `bins[i]`.
    pub means: Vec<f64>,
}

/// Builds the `N` leave-one-out bins (each of length `N - 1`) and their means.
///
/// Quadratic in `N`; the pipeline uses [`bin_means`] instead.
pub fn build_bins(values: &[f64]) -> Result<JackknifeBins, MeffError> {
    let n = values.len();
    if n < 2 {
        return Err(insufficient(n));
    }
    let mut bins = Vec::with_capacity(n);
    let mut means = Vec::with_capacity(n);
    for excluded in 0..n {
        let bin: Vec<f64> = values
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != excluded)
            .map(|(_, value)| *value)
            .collect();
        means.push(mean(&bin));
        bins.push(bin);
    }
    Ok(JackknifeBins { bins, means })
}

/// Leave-one-out means in linear time: `(sum - values[i]) / (N - 1)`.
pub fn bin_means(values: &[f64]) -> Result<Vec<f64>, MeffError> {
    let n = values.len();
    if n < 2 {
        return Err(insufficient(n));
    }
    let total = values.iter().sum::<f64>();
    let denom = (n - 1) as f64;
    Ok(values.iter().map(|value| (total - value) / denom).collect())
}

/// Jackknife standard error `sqrt(sum_i (b_i - c)^2) * sqrt((N - 1) / N)`.
///
/// `central` must be the mean of the same `per_bin` values; use [`estimate`]
/// to derive both together.
pub fn jackknife_error(per_bin: &[f64], central: f64) -> Result<f64, MeffError> {
    let n = per_bin.len();
    if n < 2 {
        return Err(insufficient(n));
    }
    if let Some(bin) = per_bin.iter().position(|value| !value.is_finite()) {
        return Err(non_finite("bin value").with_context("bin", bin));
    }
    if !central.is_finite() {
        return Err(non_finite("central value"));
    }
    let squares = per_bin
        .iter()
        .map(|value| {
            let delta = value - central;
            delta * delta
        })
        .sum::<f64>();
    let scale = ((n - 1) as f64 / n as f64).sqrt();
    let error = squares.sqrt() * scale;
    if !error.is_finite() {
        return Err(non_finite("jackknife error"));
    }
    Ok(error)
}

/// Central value and jackknife error of one resampled statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Mean over the bins.
    pub value: f64,
    /// Jackknife standard error.
    pub error: f64,
}

/// Computes the central value from `per_bin` and its error against those same bins.
pub fn estimate(per_bin: &[f64]) -> Result<Estimate, MeffError> {
    if per_bin.len() < 2 {
        return Err(insufficient(per_bin.len()));
    }
    let value = mean(per_bin);
    let error = jackknife_error(per_bin, value)?;
    Ok(Estimate { value, error })
}
