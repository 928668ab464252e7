#![deny(missing_docs)]
#![doc = "Core error surface, dataset and provenance types for the effective-mass jackknife pipeline."]

pub mod dataset;
pub mod errors;
pub mod provenance;
pub mod rng;
pub mod synth;

pub use dataset::CorrelatorDataset;
pub use errors::{ErrorInfo, MeffError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, EnsembleRng};
pub use synth::{synthetic_configuration, synthetic_ensemble, SyntheticSpec};
