use meff_core::errors::{ErrorInfo, MeffError};
use serde::{Deserialize, Serialize};

use crate::jackknife::{insufficient, mean};

fn domain_error(code: &str, message: &str, t: usize, bin: usize) -> MeffError {
    MeffError::DomainMath(
        ErrorInfo::new(code, message)
            .with_context("time_slice", t)
            .with_context("bin", bin),
    )
}

/// Per-bin log-ratio estimator for every adjacent pair `(t, t + 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveMassSeries {
    /// `central[t]` is the mean of `per_bin[t]` over the bins.
    pub central: Vec<f64>,
    /// `per_bin[t][i] = ln(means[t][i] / means[t + 1][i])`.
    pub per_bin: Vec<Vec<f64>>,
}

impl EffectiveMassSeries {
    /// Number of adjacent time-slice pairs (`T' - 1`).
    pub fn pairs(&self) -> usize {
        self.per_bin.len()
    }

    /// Number of jackknife bins `N`.
    pub fn bins(&self) -> usize {
        self.per_bin.first().map(Vec::len).unwrap_or(0)
    }
}

/// `ln(current / next)` for a single bin, rejecting non-positive operands.
pub fn log_ratio(t: usize, bin: usize, current: f64, next: f64) -> Result<f64, MeffError> {
    if !(current.is_finite() && next.is_finite()) {
        return Err(domain_error(
            "non-finite-log-operand",
            "log-ratio operands must be finite",
            t,
            bin,
        ));
    }
    if current <= 0.0 || next <= 0.0 {
        return Err(domain_error(
            "non-positive-log-operand",
            "log-ratio operands must be positive",
            t,
            bin,
        )
        .with_context("current", current)
        .with_context("next", next));
    }
    let ratio = current / next;
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(domain_error(
            "non-positive-log-ratio",
            "correlator ratio must be positive and finite",
            t,
            bin,
        ));
    }
    let value = ratio.ln();
    if !value.is_finite() {
        return Err(domain_error(
            "non-finite-log-ratio",
            "log-ratio evaluated to a non-finite value",
            t,
            bin,
        ));
    }
    Ok(value)
}

/// Computes the log-ratio estimator from a `T' x N` matrix of bin means.
///
/// Bin `i` at slice `t` is paired with bin `i` at slice `t + 1`; both must
/// exclude the same configuration.
pub fn log_ratio_series(bin_means: &[Vec<f64>]) -> Result<EffectiveMassSeries, MeffError> {
    if bin_means.len() < 2 {
        return Err(MeffError::Configuration(
            ErrorInfo::new(
                "too-few-time-slices",
                "the log-ratio estimator needs at least two time slices",
            )
            .with_context("time_slices", bin_means.len()),
        ));
    }
    let bins = bin_means[0].len();
    if bins < 2 {
        return Err(insufficient(bins).with_context("time_slice", 0));
    }
    if let Some(t) = bin_means.iter().position(|row| row.len() != bins) {
        return Err(MeffError::Configuration(
            ErrorInfo::new(
                "misaligned-bins",
                "every time slice must carry the same number of jackknife bins",
            )
            .with_context("time_slice", t)
            .with_context("expected", bins)
            .with_context("found", bin_means[t].len()),
        ));
    }

    let mut central = Vec::with_capacity(bin_means.len() - 1);
    let mut per_bin = Vec::with_capacity(bin_means.len() - 1);
    for (t, pair) in bin_means.windows(2).enumerate() {
        let row = pair[0]
            .iter()
            .zip(pair[1].iter())
            .enumerate()
            .map(|(bin, (current, next))| log_ratio(t, bin, *current, *next))
            .collect::<Result<Vec<f64>, MeffError>>()?;
        central.push(mean(&row));
        per_bin.push(row);
    }
    Ok(EffectiveMassSeries { central, per_bin })
}
