//! Weight vector operations for the genetic algorithm.
//!
//! Network weights are signed, so every operation here works on the symmetric range
//! `[-max_weight, max_weight]` and clamps its output back into it.
//!
//! - [`random`] - Uniform initialization
//! - [`blx_alpha`] - BLX-α crossover
//! - [`mutate`] - Gaussian mutation

use rand::Rng;
use rand_distr::Normal;

/// Creates a weight vector by applying `f` to each index.
///
/// # Examples
///
/// ```
/// use flapevo_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f64 + 1.0), 4);
/// assert_eq!(weights, vec![1.0, 0.5, 1.0 / 3.0, 0.25]);
/// ```
pub fn from_fn<F>(f: F, len: usize) -> Vec<f64>
where
    F: FnMut(usize) -> f64,
{
    (0..len).map(f).collect()
}

/// Generates `len` weights uniformly distributed in `[-max_weight, max_weight]`.
pub fn random<R>(rng: &mut R, max_weight: f64, len: usize) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(-max_weight..=max_weight), len)
}

/// BLX-α crossover of two parents.
///
/// Each child weight is drawn uniformly from the parents' range widened by `alpha` times
/// its width on both sides, then clamped to `[-max_weight, max_weight]`.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn blx_alpha<R>(p1: &[f64], p2: &[f64], alpha: f64, max_weight: f64, rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    from_fn(
        |i| {
            let min = f64::min(p1[i], p2[i]);
            let max = f64::max(p1[i], p2[i]);
            let d = max - min;
            rng.random_range((min - alpha * d)..=(max + alpha * d))
                .clamp(-max_weight, max_weight)
        },
        p1.len(),
    )
}

/// Adds `N(0, sigma)` noise to each weight with probability `rate`, clamping the result.
///
/// # Panics
///
/// Panics if `sigma` is negative or not finite, or `rate` is outside `[0, 1]`.
pub fn mutate<R>(weights: &mut [f64], sigma: f64, max_weight: f64, rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma).expect("mutation sigma must be finite and non-negative");
    for w in weights {
        if rng.random_bool(rate) {
            *w = (*w + rng.sample(normal)).clamp(-max_weight, max_weight);
        }
    }
}
