use meff_core::errors::{ErrorInfo, MeffError};
use meff_core::CorrelatorDataset;

fn fold_error(code: &str, message: impl Into<String>) -> MeffError {
    MeffError::Configuration(ErrorInfo::new(code, message))
}

/// Number of slices produced by folding a time extent `T`.
pub fn folded_len(time_slices: usize) -> usize {
    time_slices / 2 + 1
}

/// Averages the forward and backward halves of every configuration.
///
/// The result has `T/2 + 1` slices. Slices `0` and `T/2` are copied unchanged;
/// for `1 <= t < T/2` each configuration contributes `(C(t) + C(T - t)) / 2`.
pub fn fold(dataset: &CorrelatorDataset, time_slices: usize) -> Result<CorrelatorDataset, MeffError> {
    if time_slices < 2 || time_slices % 2 != 0 {
        return Err(fold_error("odd-time-extent", "folding requires an even time extent")
            .with_context("time_slices", time_slices));
    }
    if dataset.time_slices() != time_slices {
        return Err(fold_error(
            "time-extent-mismatch",
            "dataset time extent differs from the configured extent",
        )
        .with_context("time_slices", time_slices)
        .with_context("dataset_time_slices", dataset.time_slices()));
    }

    let half = time_slices / 2;
    let slices = dataset.slices();
    let mut folded = Vec::with_capacity(folded_len(time_slices));
    folded.push(slices[0].clone());
    for t in 1..half {
        let forward = &slices[t];
        let backward = &slices[time_slices - t];
        folded.push(
            forward
                .iter()
                .zip(backward.iter())
                .map(|(a, b)| (a + b) / 2.0)
                .collect(),
        );
    }
    folded.push(slices[half].clone());
    log::debug!(
        "folded {} slices into {} across {} configurations",
        time_slices,
        folded.len(),
        dataset.configurations()
    );
    CorrelatorDataset::from_slices(folded)
}
