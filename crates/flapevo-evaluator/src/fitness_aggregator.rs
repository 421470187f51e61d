//! Combination of per-scenario scores into a single fitness.
//!
//! ```text
//! fitness = round(Σ(score_i × weight_i) / Σ(weight_i), 4)
//! ```
//!
//! A weighted arithmetic mean: later scenarios, which are harder by construction, get
//! proportionally more influence. With non-negative weights the result always lies between
//! the smallest and largest per-scenario score (up to the final rounding).
//!
//! Scores and weights are zipped positionally and must have equal length; the weight sum is
//! validated once at construction, so aggregation never divides by zero.

use std::iter;

use flapevo_stats::summation;

use crate::error::ConfigurationError;

/// Number of decimal places kept in a fitness value.
pub const FITNESS_DECIMALS: i32 = 4;

/// Rounds `value` to [`FITNESS_DECIMALS`] decimal places.
#[must_use]
pub fn round_fitness(value: f64) -> f64 {
    let scale = 10_f64.powi(FITNESS_DECIMALS);
    (value * scale).round() / scale
}

/// Weighted mean over scenarios with validated weights.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessAggregator {
    weights: Vec<f64>,
    weight_sum: f64,
}

impl FitnessAggregator {
    /// Creates an aggregator.
    ///
    /// Fails if any weight is negative or not finite, or if the weights do not sum to a
    /// positive value.
    pub fn new(weights: Vec<f64>) -> Result<Self, ConfigurationError> {
        if let Some((index, value)) = weights
            .iter()
            .copied()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && *w >= 0.0))
        {
            return Err(ConfigurationError::InvalidWeight { index, value });
        }
        let weight_sum = summation::sum(weights.iter().copied());
        if weight_sum <= 0.0 {
            return Err(ConfigurationError::NonPositiveWeightSum { sum: weight_sum });
        }
        Ok(Self {
            weights,
            weight_sum,
        })
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Computes the rounded weighted mean of `scores`.
    ///
    /// `scores` must be in scenario order, one per weight.
    pub fn aggregate(&self, scores: &[f64]) -> Result<f64, ConfigurationError> {
        if scores.len() != self.weights.len() {
            return Err(ConfigurationError::ScenarioWeightCountMismatch {
                weights: self.weights.len(),
                scenarios: scores.len(),
            });
        }
        let weighted = summation::sum(iter::zip(scores, &self.weights).map(|(s, w)| s * w));
        Ok(round_fitness(weighted / self.weight_sum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_mean_example() {
        let aggregator = FitnessAggregator::new(vec![1.0, 2.0, 6.0]).unwrap();
        let fitness = aggregator.aggregate(&[0.50, 0.30, 0.80]).unwrap();
        // (0.5 + 0.6 + 4.8) / 9
        assert_eq!(fitness, 0.6556);
    }

    #[test]
    fn test_result_is_convex_combination() {
        let aggregator = FitnessAggregator::new(vec![0.5, 0.0, 3.0, 1.25]).unwrap();
        let scores = [-0.75, 4.0, 1.5, 0.125];
        let fitness = aggregator.aggregate(&scores).unwrap();
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!((min..=max).contains(&fitness), "fitness = {fitness}");
    }

    #[test]
    fn test_equal_weights_is_plain_mean() {
        let aggregator = FitnessAggregator::new(vec![1.0; 4]).unwrap();
        assert_eq!(aggregator.aggregate(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_length_mismatch() {
        let aggregator = FitnessAggregator::new(vec![1.0, 2.0, 6.0]).unwrap();
        assert_eq!(
            aggregator.aggregate(&[0.5, 0.3]),
            Err(ConfigurationError::ScenarioWeightCountMismatch {
                weights: 3,
                scenarios: 2
            })
        );
    }

    #[test]
    fn test_non_positive_weight_sum() {
        assert_eq!(
            FitnessAggregator::new(vec![0.0, 0.0]),
            Err(ConfigurationError::NonPositiveWeightSum { sum: 0.0 })
        );
        assert_eq!(
            FitnessAggregator::new(vec![]),
            Err(ConfigurationError::NonPositiveWeightSum { sum: 0.0 })
        );
    }

    #[test]
    fn test_invalid_weight() {
        assert_eq!(
            FitnessAggregator::new(vec![1.0, -2.0]),
            Err(ConfigurationError::InvalidWeight {
                index: 1,
                value: -2.0
            })
        );
        assert!(FitnessAggregator::new(vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_round_fitness() {
        assert_eq!(round_fitness(0.123_449), 0.1234);
        assert_eq!(round_fitness(0.123_46), 0.1235);
        assert_eq!(round_fitness(-1.000_04), -1.0);
    }
}
