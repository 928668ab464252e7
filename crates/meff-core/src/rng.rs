//! Deterministic RNG wrapper and per-configuration seed derivation.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Deterministic RNG used when synthesising ensembles.
///
/// Each configuration owns its own stream, derived from `(master_seed, index)`
/// with SipHash-1-3 and fixed zero keys, so a configuration's values do not
/// depend on how many configurations precede it or on the order in which
/// they are generated.
#[derive(Debug, Clone)]
pub struct EnsembleRng {
    rng: StdRng,
}

impl EnsembleRng {
    /// Creates a handle from a raw seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates the stream owned by configuration `index`.
    pub fn for_configuration(master_seed: u64, index: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, index))
    }

    /// Draws a uniform value in `[-1, 1)`.
    pub fn symmetric_unit(&mut self) -> f64 {
        self.rng.gen::<f64>() * 2.0 - 1.0
    }
}

impl RngCore for EnsembleRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Derives the deterministic seed for a specific substream.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
