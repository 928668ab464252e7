//! Synthetic single-state correlator ensembles.

use serde::{Deserialize, Serialize};

use crate::dataset::CorrelatorDataset;
use crate::errors::{ErrorInfo, MeffError};
use crate::rng::EnsembleRng;

fn synth_error(code: &str, message: impl Into<String>) -> MeffError {
    MeffError::Configuration(ErrorInfo::new(code, message))
}

fn default_time_slices() -> usize {
    64
}

fn default_configurations() -> usize {
    32
}

fn default_mass() -> f64 {
    0.125
}

fn default_amplitude() -> f64 {
    1.0
}

fn default_noise() -> f64 {
    0.02
}

/// Parameters of a synthetic `cosh` correlator ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSpec {
    /// Time extent `T` (even).
    #[serde(default = "default_time_slices")]
    pub time_slices: usize,
    /// Number of configurations to generate.
    #[serde(default = "default_configurations")]
    pub configurations: usize,
    /// Ground-state energy `m`.
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Overall amplitude `A`.
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    /// Relative noise level in `[0, 1)`.
    #[serde(default = "default_noise")]
    pub noise: f64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            time_slices: default_time_slices(),
            configurations: default_configurations(),
            mass: default_mass(),
            amplitude: default_amplitude(),
            noise: default_noise(),
        }
    }
}

impl SyntheticSpec {
    /// Noise-free correlator `A (e^{-m t} + e^{-m (T - t)})`.
    pub fn exact(&self, t: usize) -> f64 {
        let extent = self.time_slices as f64;
        let t = t as f64;
        self.amplitude * ((-self.mass * t).exp() + (-self.mass * (extent - t)).exp())
    }

    /// Rejects odd extents, empty ensembles and out-of-range parameters.
    pub fn validate(&self) -> Result<(), MeffError> {
        if self.time_slices < 2 || self.time_slices % 2 != 0 {
            return Err(synth_error(
                "odd-time-extent",
                "synthetic ensembles require an even time extent of at least 2",
            )
            .with_context("time_slices", self.time_slices));
        }
        if self.configurations == 0 {
            return Err(synth_error(
                "no-configurations",
                "at least one configuration must be generated",
            ));
        }
        if !(self.mass > 0.0 && self.amplitude > 0.0) {
            return Err(synth_error(
                "non-positive-parameters",
                "mass and amplitude must be positive",
            ));
        }
        if !(0.0..1.0).contains(&self.noise) {
            return Err(synth_error("invalid-noise", "noise must lie in [0, 1)")
                .with_context("noise", self.noise));
        }
        Ok(())
    }
}

/// Generates one configuration's time series.
pub fn synthetic_configuration(spec: &SyntheticSpec, seed: u64, index: usize) -> Vec<f64> {
    let mut rng = EnsembleRng::for_configuration(seed, index as u64);
    // Half of the fluctuation is shared by every slice of the configuration.
    let shared = rng.symmetric_unit();
    (0..spec.time_slices)
        .map(|t| {
            let local = rng.symmetric_unit();
            spec.exact(t) * (1.0 + spec.noise * 0.5 * (shared + local))
        })
        .collect()
}

/// Generates a deterministic ensemble of `spec.configurations` configurations.
pub fn synthetic_ensemble(spec: &SyntheticSpec, seed: u64) -> Result<CorrelatorDataset, MeffError> {
    spec.validate()?;
    let rows: Vec<Vec<f64>> = (0..spec.configurations)
        .map(|index| synthetic_configuration(spec, seed, index))
        .collect();
    CorrelatorDataset::from_configurations(spec.time_slices, &rows)
}
