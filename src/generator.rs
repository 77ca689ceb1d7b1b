//! Hypervector Generator: random vectors in the configured representation.
//!
//! Every call draws a fresh vector. By default each call seeds its own
//! ChaCha8 stream from OS entropy, so nothing is reproducible across calls
//! or runs. A generator built with [`HypervectorGenerator::with_seed`]
//! instead derives each call's seed from SHA-256 of the global seed and a
//! call counter, which replays the same sequence of vectors every run.

use crate::error::{ItemMemError, Result};
use crate::representation::Representation;
use crate::vector::Hypervector;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Produces random hypervectors of a fixed length and representation.
#[derive(Debug)]
pub struct HypervectorGenerator {
    dimensions: usize,
    representation: Representation,
    seed: Option<u64>,
    /// Number of vectors generated so far
    calls: AtomicU64,
}

impl HypervectorGenerator {
    /// Create a generator seeded from OS entropy on every call.
    pub fn new(dimensions: usize, representation: Representation) -> Result<Self> {
        Self::build(dimensions, representation, None)
    }

    /// Create a generator whose output sequence is fixed by `global_seed`.
    pub fn with_seed(
        dimensions: usize,
        representation: Representation,
        global_seed: u64,
    ) -> Result<Self> {
        Self::build(dimensions, representation, Some(global_seed))
    }

    fn build(dimensions: usize, representation: Representation, seed: Option<u64>) -> Result<Self> {
        if dimensions == 0 {
            return Err(ItemMemError::InvalidDimensions(dimensions));
        }
        Ok(Self {
            dimensions,
            representation,
            seed,
            calls: AtomicU64::new(0),
        })
    }

    /// Get the dimensions.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Get the representation.
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Number of vectors produced so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Generate one random hypervector.
    ///
    /// Each element is an independent fair coin flip over the two symbols
    /// of the representation.
    pub fn generate(&self) -> Hypervector {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let mut rng = match self.seed {
            Some(global_seed) => ChaCha8Rng::seed_from_u64(Self::derive_seed(global_seed, call)),
            None => ChaCha8Rng::from_entropy(),
        };

        let data: Vec<i8> = (0..self.dimensions)
            .map(|_| self.representation.symbol_for_bit(rng.next_u32()))
            .collect();

        Hypervector::from_data(data)
    }

    /// Seed for call number `call` under `global_seed`.
    fn derive_seed(global_seed: u64, call: u64) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(global_seed.to_le_bytes());
        hasher.update(call.to_le_bytes());
        let hash = hasher.finalize();

        let mut seed = [0u8; 8];
        seed.copy_from_slice(&hash[0..8]);
        u64::from_le_bytes(seed)
    }
}
