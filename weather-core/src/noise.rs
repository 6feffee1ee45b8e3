use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

/// Source of random draws consumed by the synthetic generator.
///
/// Every call consumes exactly one draw from the underlying stream, so the
/// order of calls fully determines the output.
pub trait NoiseSource {
    /// Gaussian draw with the given mean and standard deviation.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;

    /// Uniform integer in `[low, high)`.
    fn integer(&mut self, low: u32, high: u32) -> u32;
}

/// Seeded pseudo-random stream; same seed, same sequence.
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + std_dev * z
    }

    fn integer(&mut self, low: u32, high: u32) -> u32 {
        self.rng.random_range(low..high)
    }
}
