// Random source abstraction - injected so simulations can be replayed

/// Uniform random numbers in `[0, 1)`.
pub trait RandomSource: Send {
    fn next(&mut self) -> f64;

    /// Uniform value in `[low, high)`.
    fn range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next()
    }

    /// True with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next() < probability
    }
}

#[cfg(test)]
pub mod testing {
    use super::RandomSource;

    /// Replays a fixed sequence of draws, cycling when exhausted.
    pub struct SequenceRandom {
        values: Vec<f64>,
        index: usize,
    }

    impl SequenceRandom {
        pub fn new(values: Vec<f64>) -> Self {
            assert!(!values.is_empty(), "sequence must not be empty");
            Self { values, index: 0 }
        }

        pub fn constant(value: f64) -> Self {
            Self::new(vec![value])
        }
    }

    impl RandomSource for SequenceRandom {
        fn next(&mut self) -> f64 {
            let value = self.values[self.index % self.values.len()];
            self.index += 1;
            value
        }
    }
}
