//! Evaluation scenarios.
//!
//! A [`Scenario`] is one fixed environment configuration: the gap value of every obstacle
//! in order, plus the number of obstacles that counts as a successful run. A
//! [`ScenarioSet`] is the ordered list every candidate is evaluated against; a scenario's
//! identity is its index in the set.
//!
//! Scenario sets are usually generated from a [`ScenarioSetConfig`]: a seed and one
//! [`ScenarioSpec`] per scenario. Generation is deterministic, so the same config always
//! produces the same set.
//!
//! # Example
//!
//! ```
//! use flapevo_evaluator::scenario::{ScenarioSet, ScenarioSetConfig};
//!
//! let config = ScenarioSetConfig::default();
//! let a = ScenarioSet::generate(&config).unwrap();
//! let b = ScenarioSet::generate(&config).unwrap();
//! assert_eq!(a, b);
//! ```

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// One evaluation scenario. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    gaps: Vec<u32>,
    target_count: usize,
}

impl Scenario {
    #[must_use]
    pub fn new(gaps: Vec<u32>, target_count: usize) -> Self {
        Self { gaps, target_count }
    }

    /// Gap value of each obstacle, in spawn order.
    #[must_use]
    pub fn gaps(&self) -> &[u32] {
        &self.gaps
    }

    /// Number of passed obstacles that ends the episode successfully.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.target_count
    }
}

/// Ordered, validated, non-empty list of scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Scenario>", into = "Vec<Scenario>")]
pub struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

impl TryFrom<Vec<Scenario>> for ScenarioSet {
    type Error = ConfigurationError;

    fn try_from(scenarios: Vec<Scenario>) -> Result<Self, Self::Error> {
        Self::new(scenarios)
    }
}

impl From<ScenarioSet> for Vec<Scenario> {
    fn from(set: ScenarioSet) -> Self {
        set.scenarios
    }
}

impl ScenarioSet {
    /// Creates a scenario set.
    ///
    /// Fails if the set is empty, or if any scenario has no gaps or a zero target count.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, ConfigurationError> {
        if scenarios.is_empty() {
            return Err(ConfigurationError::EmptyScenarioSet);
        }
        for (index, scenario) in scenarios.iter().enumerate() {
            if scenario.gaps.is_empty() {
                return Err(ConfigurationError::EmptyGapSequence { scenario: index });
            }
            if scenario.target_count == 0 {
                return Err(ConfigurationError::ZeroTargetCount { scenario: index });
            }
        }
        Ok(Self { scenarios })
    }

    /// Generates a scenario set deterministically from `config`.
    pub fn generate(config: &ScenarioSetConfig) -> Result<Self, ConfigurationError> {
        let mut rng = Pcg64::seed_from_u64(config.seed);
        let scenarios = config
            .scenarios
            .iter()
            .map(|spec| {
                let gaps = (0..spec.gap_count)
                    .map(|_| rng.random_range(0..=spec.max_gap_offset))
                    .collect();
                Scenario::new(gaps, spec.target_count)
            })
            .collect();
        Self::new(scenarios)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Always `false`; kept for API symmetry with [`len`](Self::len).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Scenario> + '_ {
        self.scenarios.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Scenario] {
        &self.scenarios
    }
}

impl<'a> IntoIterator for &'a ScenarioSet {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}

/// Generation parameters for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Length of the gap sequence (cycled by the environment if exhausted).
    pub gap_count: usize,
    /// Gap values are drawn uniformly from `0..=max_gap_offset`.
    pub max_gap_offset: u32,
    pub target_count: usize,
}

/// Seed plus per-scenario parameters for [`ScenarioSet::generate`].
///
/// The default describes three scenarios of increasing difficulty: longer runs and wider
/// vertical swings between consecutive openings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSetConfig {
    pub seed: u64,
    pub scenarios: Vec<ScenarioSpec>,
}

impl Default for ScenarioSetConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            scenarios: vec![
                ScenarioSpec {
                    gap_count: 48,
                    max_gap_offset: 80,
                    target_count: 5,
                },
                ScenarioSpec {
                    gap_count: 96,
                    max_gap_offset: 160,
                    target_count: 15,
                },
                ScenarioSpec {
                    gap_count: 192,
                    max_gap_offset: 250,
                    target_count: 40,
                },
            ],
        }
    }
}
