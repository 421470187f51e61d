//! Evaluation configuration.
//!
//! Every tunable of the fitness function is a named value here rather than a literal in
//! the evaluation code. The whole configuration is (de)serializable with serde; missing
//! fields take their defaults.
//!
//! ```json
//! {
//!   "normalizer": {
//!     "distance_weight": 1.0,
//!     "score_weight": 1.0,
//!     "misalignment_weight": 0.08,
//!     "distance_divisor": 195.0
//!   },
//!   "scenario_weights": [1.0, 2.0, 6.0],
//!   "decision_threshold": 0.4,
//!   "max_steps_per_episode": 20000,
//!   "fault_policy": "abort-generation",
//!   "worker_count": null
//! }
//! ```

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigurationError, fitness_aggregator::FitnessAggregator, policy::DecisionThreshold,
    scenario::ScenarioSet, score_normalizer::ScoreNormalizer,
};

/// What to do when a single candidate cannot be evaluated.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultPolicy {
    /// Fail the whole generation with the first (by candidate order) fault.
    #[default]
    AbortGeneration,
    /// Give the faulted candidate this fitness and continue.
    AssignFitness(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub normalizer: ScoreNormalizer,
    /// One weight per scenario, in scenario order.
    pub scenario_weights: Vec<f64>,
    pub decision_threshold: DecisionThreshold,
    /// Hard ceiling on steps per episode.
    pub max_steps_per_episode: usize,
    pub fault_policy: FaultPolicy,
    /// Worker threads per generation; `None` uses the available parallelism.
    pub worker_count: Option<NonZeroUsize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            normalizer: ScoreNormalizer::default(),
            scenario_weights: vec![1.0, 2.0, 6.0],
            decision_threshold: DecisionThreshold::default(),
            max_steps_per_episode: 20_000,
            fault_policy: FaultPolicy::default(),
            worker_count: None,
        }
    }
}

impl EvaluationConfig {
    /// Checks the configuration on its own and against `scenarios`.
    pub fn validate(&self, scenarios: &ScenarioSet) -> Result<(), ConfigurationError> {
        self.normalizer.validate()?;
        self.decision_threshold.validate()?;
        if self.max_steps_per_episode == 0 {
            return Err(ConfigurationError::ZeroStepLimit);
        }
        if let FaultPolicy::AssignFitness(value) = self.fault_policy
            && !value.is_finite()
        {
            return Err(ConfigurationError::InvalidFaultFitness { value });
        }
        if self.scenario_weights.len() != scenarios.len() {
            return Err(ConfigurationError::ScenarioWeightCountMismatch {
                weights: self.scenario_weights.len(),
                scenarios: scenarios.len(),
            });
        }
        FitnessAggregator::new(self.scenario_weights.clone())?;
        Ok(())
    }

    /// Number of worker threads to use.
    #[must_use]
    pub fn resolved_worker_count(&self) -> NonZeroUsize {
        self.worker_count.unwrap_or_else(|| {
            std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Scenario, ScenarioSet};

    fn scenarios(count: usize) -> ScenarioSet {
        ScenarioSet::new(vec![Scenario::new(vec![0], 1); count]).unwrap()
    }

    #[test]
    fn test_default_is_valid_for_three_scenarios() {
        assert!(EvaluationConfig::default().validate(&scenarios(3)).is_ok());
    }

    #[test]
    fn test_weight_count_mismatch() {
        let config = EvaluationConfig {
            scenario_weights: vec![1.0, 2.0],
            ..EvaluationConfig::default()
        };
        assert_eq!(
            config.validate(&scenarios(3)),
            Err(ConfigurationError::ScenarioWeightCountMismatch {
                weights: 2,
                scenarios: 3
            })
        );
    }

    #[test]
    fn test_zero_step_limit() {
        let config = EvaluationConfig {
            max_steps_per_episode: 0,
            ..EvaluationConfig::default()
        };
        assert_eq!(
            config.validate(&scenarios(3)),
            Err(ConfigurationError::ZeroStepLimit)
        );
    }

    #[test]
    fn test_non_finite_fault_fitness() {
        let config = EvaluationConfig {
            fault_policy: FaultPolicy::AssignFitness(f64::NEG_INFINITY),
            ..EvaluationConfig::default()
        };
        assert!(config.validate(&scenarios(3)).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EvaluationConfig = serde_json::from_str(
            r#"{"scenario_weights":[1.0,1.0],"fault_policy":{"assign-fitness":-1.0}}"#,
        )
        .unwrap();
        assert_eq!(config.scenario_weights, vec![1.0, 1.0]);
        assert_eq!(config.fault_policy, FaultPolicy::AssignFitness(-1.0));
        assert_eq!(config.normalizer, ScoreNormalizer::default());
        assert_eq!(config.max_steps_per_episode, 20_000);
    }

    #[test]
    fn test_roundtrip() {
        let config = EvaluationConfig {
            worker_count: NonZeroUsize::new(4),
            ..EvaluationConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EvaluationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
