//! Injectable noise for forecast probabilities.
//!
//! Every source is a pure function of the day index so a forecast can be
//! regenerated exactly. Samples lie in [-1, 1] and are scaled by the
//! generator's noise amplitude.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait NoiseSource {
    /// Sample for `day_index`, in [-1, 1].
    fn sample(&self, day_index: u32) -> f64;
}

/// No noise at all; forecasts are the bare weighted score plus trend.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn sample(&self, _day_index: u32) -> f64 {
        0.0
    }
}

/// Seeded `ChaCha8Rng` noise. Each day reads its own stream, so a sample
/// depends only on `(seed, day_index)`.
#[derive(Debug, Clone, Copy)]
pub struct SeededNoise {
    seed: u64,
}

impl SeededNoise {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self { seed }
    }
}

impl NoiseSource for SeededNoise {
    fn sample(&self, day_index: u32) -> f64 {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(u64::from(day_index));
        rng.gen_range(-1.0..=1.0)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn sample(&self, day_index: u32) -> f64 {
        (**self).sample(day_index)
    }
}
