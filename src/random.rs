//! Seeded random number generation.
//!
//! Every stochastic routine in this crate takes its generator as an
//! argument (`&mut dyn RngCore`), so runs are reproducible from a seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

/// Creates a deterministic generator from `seed`.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_moea::random::create_rng;
///
/// let mut a = create_rng(7);
/// let mut b = create_rng(7);
/// assert_eq!(a.random::<u64>(), b.random::<u64>());
/// ```
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator seeded from the thread-local entropy source.
pub fn create_unseeded_rng() -> StdRng {
    create_rng(rand::random())
}

/// Shuffles `items` in place (Fisher-Yates).
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RngCore) {
    items.shuffle(rng);
}

/// Draws a uniform value in `[0, 1)`.
pub(crate) fn next_f64(rng: &mut dyn RngCore) -> f64 {
    rng.random::<f64>()
}

/// Returns `true` with probability `p`. `p` must lie in `[0, 1]`.
///
/// Unlike `next_f64() < p`, a probability of exactly `1.0` always fires.
pub(crate) fn chance(p: f64, rng: &mut dyn RngCore) -> bool {
    next_f64(rng) < p || p >= 1.0
}
