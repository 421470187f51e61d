//! Episode execution: one policy against one scenario.
//!
//! # How It Works
//!
//! Each step of an episode:
//!
//! 1. **Observe** - Query the environment state and build an [`Observation`]
//! 2. **Decide** - Ask the policy for a [`Decision`](crate::policy::Decision)
//! 3. **Act** - Map the decision through the [`DecisionThreshold`] and step the environment
//! 4. **Credit** - A positive reward counts as one passed obstacle
//!
//! # Termination
//!
//! | kind | condition | raw score | misalignment |
//! |------|-----------|-----------|--------------|
//! | [`Termination::TargetReached`] | passed obstacles reach the scenario target | target count | 0 |
//! | [`Termination::Failure`] | the environment reports the episode ended | passed so far | at the last observed state |
//! | [`Termination::Exhausted`] | the step limit was reached | passed so far | at the last observed state |
//!
//! If a step both reaches the target and ends the episode, the target wins.
//!
//! The step limit bounds episodes whose policy neither fails nor reaches the target. An
//! exhausted episode is not an error: it is scored like a failure and logged at `warn`.

use flapevo_engine::{Environment, EnvironmentFault};
use serde::{Deserialize, Serialize};

use crate::{
    policy::{DecisionThreshold, Observation, Policy},
    scenario::Scenario,
};

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    TargetReached,
    Failure,
    Exhausted,
}

/// Raw result of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    raw_score: usize,
    survival_distance: usize,
    terminal_misalignment: f64,
    termination: Termination,
}

impl EpisodeOutcome {
    /// Creates an outcome.
    ///
    /// `terminal_misalignment` is forced to zero for [`Termination::TargetReached`].
    #[must_use]
    pub fn new(
        raw_score: usize,
        survival_distance: usize,
        terminal_misalignment: f64,
        termination: Termination,
    ) -> Self {
        let terminal_misalignment = if termination.is_target_reached() {
            0.0
        } else {
            terminal_misalignment.abs()
        };
        Self {
            raw_score,
            survival_distance,
            terminal_misalignment,
            termination,
        }
    }

    /// Obstacles passed.
    #[must_use]
    pub fn raw_score(&self) -> usize {
        self.raw_score
    }

    /// Steps survived.
    #[must_use]
    pub fn survival_distance(&self) -> usize {
        self.survival_distance
    }

    /// Distance between agent and opening center at the last observed state.
    #[must_use]
    pub fn terminal_misalignment(&self) -> f64 {
        self.terminal_misalignment
    }

    #[must_use]
    pub fn termination(&self) -> Termination {
        self.termination
    }
}

/// Drives a policy through one scenario with a hard step limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeRunner {
    threshold: DecisionThreshold,
    max_steps: usize,
}

impl EpisodeRunner {
    /// Creates a runner.
    ///
    /// # Panics
    ///
    /// Panics if `max_steps` is zero.
    #[must_use]
    pub fn new(threshold: DecisionThreshold, max_steps: usize) -> Self {
        assert!(max_steps > 0, "step limit must be positive");
        Self {
            threshold,
            max_steps,
        }
    }

    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Runs one episode to termination.
    ///
    /// The environment must already be reset with `scenario`
    /// (see [`Environment::reset_with_scenario`]); this method only steps it. No state is
    /// kept between calls.
    pub fn run<E, P>(
        &self,
        env: &mut E,
        policy: &P,
        scenario: &Scenario,
    ) -> Result<EpisodeOutcome, EnvironmentFault>
    where
        E: Environment + ?Sized,
        P: Policy + ?Sized,
    {
        let target_count = scenario.target_count();
        let mut passed: usize = 0;
        let mut last_misalignment = 0.0;

        if env.is_terminal() {
            let observation = Observation::from_state(&env.state()?);
            return Ok(EpisodeOutcome::new(
                0,
                0,
                observation.misalignment(),
                Termination::Failure,
            ));
        }

        for step in 1..=self.max_steps {
            let observation = Observation::from_state(&env.state()?);
            last_misalignment = observation.misalignment();

            let decision = policy.activate(&observation);
            let reward = env.act(self.threshold.action(decision));
            if reward > 0.0 {
                #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let newly_passed = reward.ceil() as usize;
                passed = passed.saturating_add(newly_passed);
            }

            if passed >= target_count {
                return Ok(EpisodeOutcome::new(
                    target_count,
                    step,
                    0.0,
                    Termination::TargetReached,
                ));
            }
            if env.is_terminal() {
                return Ok(EpisodeOutcome::new(
                    passed,
                    step,
                    last_misalignment,
                    Termination::Failure,
                ));
            }
        }

        tracing::warn!(
            max_steps = self.max_steps,
            passed,
            target_count,
            "episode hit the step limit"
        );
        Ok(EpisodeOutcome::new(
            passed,
            self.max_steps,
            last_misalignment,
            Termination::Exhausted,
        ))
    }
}
