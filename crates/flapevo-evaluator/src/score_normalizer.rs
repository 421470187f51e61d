//! Outcome normalization: one [`EpisodeOutcome`] to one comparable scalar.
//!
//! ```text
//! score = distance_weight    × (survival_distance / distance_divisor)
//!       + score_weight       × (raw_score / target_count)
//!       − misalignment_weight × (terminal_misalignment / environment_height)
//! ```
//!
//! No clamping is applied: the score may be negative or exceed 1. Scores only need to be
//! comparable across candidates, not bounded.

use serde::{Deserialize, Serialize};

use crate::{episode_runner::EpisodeOutcome, error::ConfigurationError};

/// Per-scenario constants the normalization depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioConstants {
    pub target_count: usize,
    pub environment_height: f64,
}

/// Weights and divisor of the normalization formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreNormalizer {
    pub distance_weight: f64,
    pub score_weight: f64,
    pub misalignment_weight: f64,
    pub distance_divisor: f64,
}

impl Default for ScoreNormalizer {
    fn default() -> Self {
        Self {
            distance_weight: 1.0,
            score_weight: 1.0,
            misalignment_weight: 0.08,
            distance_divisor: 195.0,
        }
    }
}

impl ScoreNormalizer {
    /// Checks that every weight is finite and non-negative and the divisor is positive.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let weights = [
            ("distance_weight", self.distance_weight),
            ("score_weight", self.score_weight),
            ("misalignment_weight", self.misalignment_weight),
        ];
        for (name, value) in weights {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigurationError::InvalidNormalizerConstant { name, value });
            }
        }
        if !(self.distance_divisor.is_finite() && self.distance_divisor > 0.0) {
            return Err(ConfigurationError::InvalidNormalizerConstant {
                name: "distance_divisor",
                value: self.distance_divisor,
            });
        }
        Ok(())
    }

    /// Normalizes one outcome. Pure.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn normalize(&self, outcome: &EpisodeOutcome, constants: ScenarioConstants) -> f64 {
        let distance = outcome.survival_distance() as f64 / self.distance_divisor;
        let score = outcome.raw_score() as f64 / constants.target_count as f64;
        let misalignment = outcome.terminal_misalignment() / constants.environment_height;
        self.distance_weight * distance + self.score_weight * score
            - self.misalignment_weight * misalignment
    }
}
