//! The random source threaded through every generation call.
//!
//! There is no process-wide generator: each stage borrows the same
//! `&mut SynthRng`, so a seed fully determines the dataset.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

use retail_synth_core::{SynthError, SynthResult, Weighted};

pub type SynthRng = ChaCha8Rng;

/// Seeded when a seed is supplied, entropy-backed otherwise.
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> SynthRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Zero-mean Gaussian noise. A standard deviation of 0 disables it without
/// consuming randomness.
#[derive(Debug, Clone, Copy)]
pub struct Noise {
    normal: Option<Normal<f64>>,
}

impl Noise {
    /// # Errors
    ///
    /// Returns `SynthError::Distribution` for a negative or non-finite deviation.
    pub fn new(std_dev: f64) -> SynthResult<Self> {
        // rand_distr 0.4 accepts a negative deviation and mirrors the samples
        if !(std_dev >= 0.0) || !std_dev.is_finite() {
            return Err(SynthError::Distribution(format!(
                "noise standard deviation must be finite and non-negative, got {std_dev}"
            )));
        }
        if std_dev == 0.0 {
            return Ok(Self { normal: None });
        }
        let normal = Normal::new(0.0, std_dev)
            .map_err(|e| SynthError::Distribution(format!("normal(0, {std_dev}): {e}")))?;
        Ok(Self {
            normal: Some(normal),
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.normal.as_ref().map_or(0.0, |n| n.sample(rng))
    }
}

/// Categorical draw over labelled weights.
#[derive(Debug, Clone)]
pub struct WeightedChoice {
    labels: Vec<String>,
    index: WeightedIndex<f64>,
}

impl WeightedChoice {
    /// # Errors
    ///
    /// Returns `SynthError::Distribution` if the list is empty or a weight is invalid.
    pub fn new(entries: &[Weighted]) -> SynthResult<Self> {
        let index = WeightedIndex::new(entries.iter().map(|w| w.weight))
            .map_err(|e| SynthError::Distribution(format!("weighted choice: {e}")))?;
        Ok(Self {
            labels: entries.iter().map(|w| w.label.clone()).collect(),
            index,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.labels[self.index.sample(rng)]
    }
}
