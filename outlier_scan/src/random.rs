//! Injectable randomness for window and file selection.
//!
//! Every random choice a scan makes goes through [`RandomSource`], so callers
//! decide whether a run is reproducible (seeded [`rand::rngs::StdRng`]) or not.

use rand::Rng;

/// Source of uniformly distributed indices.
pub trait RandomSource {
    /// Returns an index in `0..upper`. `upper` is always non-zero.
    fn below(&mut self, upper: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
    fn below(&mut self, upper: usize) -> usize {
        self.random_range(0..upper)
    }
}
