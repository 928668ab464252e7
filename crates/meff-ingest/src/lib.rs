#![deny(missing_docs)]
#![doc = "Ingestion of per-configuration correlator sources into a validated dataset."]

pub mod archive;
/// Column parsing of configuration sources.
pub mod parse;
pub mod select;

use meff_core::errors::{ErrorInfo, MeffError};
use meff_core::CorrelatorDataset;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub use archive::{collect_entries, DataSource, RawEntry};
pub use parse::{format_configuration, parse_bytes, parse_correlator};
pub use select::{EntrySelector, GlobSelector};

fn default_time_slices() -> usize {
    64
}

fn default_column() -> usize {
    4
}

fn default_include() -> Vec<String> {
    vec!["**/*.dat".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["**/__MACOSX/**".to_string()]
}

fn default_threads() -> usize {
    1
}

/// How configuration sources are located and read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Lines (time slices) required from every source.
    #[serde(default = "default_time_slices")]
    pub time_slices: usize,
    /// 0-based whitespace column holding the correlator value.
    #[serde(default = "default_column")]
    pub column: usize,
    /// Entries must match one of these globs.
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    /// Entries matching any of these globs are skipped.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    /// Parser threads.
    #[serde(default = "default_threads")]
    pub threads: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            time_slices: default_time_slices(),
            column: default_column(),
            include: default_include(),
            exclude: default_exclude(),
            threads: default_threads(),
        }
    }
}

impl IngestOptions {
    /// Options for a given time extent with every other field defaulted.
    pub fn with_time_slices(time_slices: usize) -> Self {
        Self {
            time_slices,
            ..Self::default()
        }
    }

    /// Compiles the include/exclude globs.
    pub fn selector(&self) -> Result<GlobSelector, MeffError> {
        GlobSelector::new(&self.include, &self.exclude)
    }
}

/// A source that was dropped from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedEntry {
    /// Entry name.
    pub name: String,
    /// Why parsing failed.
    pub reason: ErrorInfo,
}

/// Outcome of ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// Dataset built from the accepted entries, in entry-name order.
    pub dataset: CorrelatorDataset,
    /// Names of the accepted entries; position `i` is configuration `i`.
    pub accepted: Vec<String>,
    /// Entries excluded during parsing.
    pub rejected: Vec<RejectedEntry>,
}

/// Parses `entries` into a dataset, excluding every entry that fails.
///
/// Configuration order follows the order of `entries` for any thread count.
/// Fails only when the options are invalid or no entry survives.
pub fn ingest_entries(
    entries: &[RawEntry],
    opts: &IngestOptions,
) -> Result<IngestReport, MeffError> {
    if opts.time_slices == 0 {
        return Err(MeffError::Configuration(ErrorInfo::new(
            "zero-time-slices",
            "the time extent must be positive",
        )));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads.max(1))
        .build()
        .map_err(|err| {
            MeffError::Configuration(ErrorInfo::new("thread-pool", err.to_string()))
        })?;
    let parsed: Vec<Result<Vec<f64>, MeffError>> = pool.install(|| {
        entries
            .par_iter()
            .map(|entry| parse_bytes(&entry.bytes, opts.time_slices, opts.column))
            .collect()
    });

    let mut rows = Vec::with_capacity(entries.len());
    let mut accepted = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for (entry, outcome) in entries.iter().zip(parsed) {
        match outcome {
            Ok(values) => {
                rows.push(values);
                accepted.push(entry.name.clone());
            }
            Err(err) => {
                let err = err.with_context("entry", &entry.name);
                log::warn!("excluding {}: {}", entry.name, err.info());
                rejected.push(RejectedEntry {
                    name: entry.name.clone(),
                    reason: err.info().clone(),
                });
            }
        }
    }
    if rows.is_empty() {
        return Err(MeffError::Ingestion(
            ErrorInfo::new("no-usable-data", "no usable data")
                .with_context("entries", entries.len())
                .with_context("rejected", rejected.len())
                .with_hint("check the include/exclude globs and the column index"),
        ));
    }
    log::info!(
        "ingested {} configurations ({} excluded)",
        rows.len(),
        rejected.len()
    );
    let dataset = CorrelatorDataset::from_configurations(opts.time_slices, &rows)?;
    Ok(IngestReport {
        dataset,
        accepted,
        rejected,
    })
}

/// Reads, selects and parses every configuration in `source`.
pub fn ingest_source(source: &DataSource, opts: &IngestOptions) -> Result<IngestReport, MeffError> {
    let selector = opts.selector()?;
    ingest_source_with(source, opts, &selector)
}

/// Like [`ingest_source`] with a caller-supplied selection predicate.
pub fn ingest_source_with(
    source: &DataSource,
    opts: &IngestOptions,
    selector: &dyn EntrySelector,
) -> Result<IngestReport, MeffError> {
    let entries = collect_entries(source, selector)?;
    ingest_entries(&entries, opts).map_err(|err| err.with_context("path", source.label()))
}
