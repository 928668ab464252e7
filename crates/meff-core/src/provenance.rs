//! Provenance and schema descriptors attached to analysis artefacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Describes where the measurements behind a report came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Canonical hash of the ingested dataset.
    pub dataset_hash: String,
    /// Human readable label of the data source (archive path, job label).
    pub source: String,
    /// Number of configurations that entered the dataset.
    pub accepted: usize,
    /// Number of configurations excluded during ingestion.
    pub rejected: usize,
    /// Version map for the tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Creates a provenance record tagged with this crate's version.
    pub fn new(dataset_hash: impl Into<String>, source: impl Into<String>) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            "meff-core".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        Self {
            dataset_hash: dataset_hash.into(),
            source: source.into(),
            accepted: 0,
            rejected: 0,
            tool_versions,
        }
    }

    /// Records the ingestion counts.
    pub fn with_counts(mut self, accepted: usize, rejected: usize) -> Self {
        self.accepted = accepted;
        self.rejected = rejected;
        self
    }
}
