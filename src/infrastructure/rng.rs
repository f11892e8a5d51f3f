// Random source backed by the rand crate
use crate::application::random_source::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible when `seed` is set, otherwise seeded from the OS.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl RandomSource for StdRandom {
    fn next(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}
