#![deny(missing_docs)]
#![doc = "Jackknife effective-mass extraction: folding, leave-one-out resampling, log-ratio estimator and weighted plateau fits."]

/// Folded-vs-unfolded and reference comparisons.
pub mod compare;
/// Analysis parameters.
pub mod config;
/// Log-ratio effective-mass estimator.
pub mod effmass;
/// CSV and JSON sinks.
pub mod export;
/// Time-reflection folding.
pub mod fold;
/// Canonical hashing helpers.
pub mod hash;
pub mod jackknife;
/// End-to-end pipeline.
pub mod pipeline;
/// Inverse-variance weighted plateau fits.
pub mod plateau;
/// Report payloads.
pub mod report;
/// Canonical JSON and YAML serde helpers.
pub mod serde;

pub use compare::{
    compare_folding, compare_reference, FoldingComparison, ReferenceComparison, SeriesDelta,
};
pub use config::AnalysisConfig;
pub use effmass::{log_ratio, log_ratio_series, EffectiveMassSeries};
pub use export::{read_series_csv, write_json, write_series_csv};
pub use fold::{fold, folded_len};
pub use hash::{dataset_hash, stable_hash_string};
pub use jackknife::{bin_means, build_bins, estimate, jackknife_error, Estimate, JackknifeBins};
pub use pipeline::{
    analyze, analyze_with_source, effective_mass_errors, resample_slices, run_pipeline,
    PipelineOutput,
};
pub use plateau::{fit_plateau, plateau_weights, PlateauFit, PlateauRange};
pub use report::{AnalysisReport, PlateauSummary, SeriesPoint};
pub use crate::serde::{from_json_slice, from_yaml_slice, to_canonical_json_bytes, to_yaml_string};
