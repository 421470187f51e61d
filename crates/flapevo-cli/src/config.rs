use std::path::Path;

use flapevo_engine::{EnvSeed, FlappyConfig, FlappyEnv};
use flapevo_evaluator::{config::EvaluationConfig, scenario::ScenarioSetConfig};
use serde::{Deserialize, Serialize};

use crate::util;

/// Everything a `train` or `evaluate` run is configured with.
///
/// Loaded from the `--config` JSON file; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct RunConfig {
    pub(crate) environment: FlappyConfig,
    pub(crate) env_seed: EnvSeed,
    pub(crate) scenarios: ScenarioSetConfig,
    pub(crate) evaluation: EvaluationConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            environment: FlappyConfig::default(),
            env_seed: EnvSeed::from(0),
            scenarios: ScenarioSetConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

impl RunConfig {
    pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => util::read_json_file("config", path),
            None => Ok(Self::default()),
        }
    }

    /// Network input scale: observations are divided by the field height.
    pub(crate) fn input_scale(&self) -> f64 {
        self.environment.height.recip()
    }

    pub(crate) fn new_env(&self) -> FlappyEnv {
        FlappyEnv::with_config(self.environment, self.env_seed)
    }
}
