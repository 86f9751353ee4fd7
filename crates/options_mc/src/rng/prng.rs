//! Pseudo-random number generator wrapper for Monte Carlo simulations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Monte Carlo simulation random number generator.
///
/// Wraps `rand::rngs::StdRng` and samples normals through
/// `rand_distr::StandardNormal` (Ziggurat).
///
/// # Examples
///
/// ```rust
/// use options_mc::rng::McRng;
///
/// let mut a = McRng::from_seed(7);
/// let mut b = McRng::from_seed(7);
/// assert_eq!(a.gen_normal(), b.gen_normal());
/// assert_eq!(a.seed(), Some(7));
/// ```
#[derive(Debug, Clone)]
pub struct McRng {
    inner: StdRng,
    /// `None` when seeded from OS entropy.
    seed: Option<u64>,
}

impl McRng {
    /// Creates a generator initialised with the given seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Creates a generator seeded from operating system entropy.
    ///
    /// Runs are not reproducible; [`seed`](Self::seed) returns `None`.
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Seeded when `seed` is `Some`, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Returns the seed used for initialisation, if any.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generates a single uniform random value in [0, 1).
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Generates a single standard normal variate (mean 0, std 1).
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Fills `buffer` with standard normal variates.
    ///
    /// Produces exactly the values `buffer.len()` successive
    /// [`gen_normal`](Self::gen_normal) calls would.
    #[inline]
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }
}
