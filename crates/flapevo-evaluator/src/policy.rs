//! Policy seams: what a policy sees, what it returns, and how it is built.
//!
//! - [`Observation`] - Fixed-size input vector recomputed from the environment every step
//! - [`Decision`] - Single numeric policy output
//! - [`DecisionThreshold`] - Maps a decision to a discrete [`Action`]
//! - [`Policy`] - Pure decision function
//! - [`PolicyDescription`] - What the optimizer hands over; materialized into a [`Policy`]
//!   once per candidate

use std::{convert::Infallible, error::Error};

use flapevo_engine::{Action, EnvState};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Number of values in an [`Observation`].
pub const OBSERVATION_LEN: usize = 3;

/// Policy input derived from the current environment state.
///
/// Layout: `[player_y, next_gap_bottom_y, gap_center_y]`. No state is carried between
/// observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation([f64; OBSERVATION_LEN]);

impl Observation {
    #[must_use]
    pub const fn new(player_y: f64, gap_bottom_y: f64, gap_center_y: f64) -> Self {
        Self([player_y, gap_bottom_y, gap_center_y])
    }

    #[must_use]
    pub fn from_state(state: &EnvState) -> Self {
        Self::new(
            state.player_y,
            state.next_gap_bottom_y,
            state.gap_center_y(),
        )
    }

    #[must_use]
    pub const fn player_y(&self) -> f64 {
        self.0[0]
    }

    #[must_use]
    pub const fn gap_bottom_y(&self) -> f64 {
        self.0[1]
    }

    #[must_use]
    pub const fn gap_center_y(&self) -> f64 {
        self.0[2]
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f64; OBSERVATION_LEN] {
        &self.0
    }

    /// Vertical distance between the agent and the center of the next opening.
    #[must_use]
    pub fn misalignment(&self) -> f64 {
        (self.player_y() - self.gap_center_y()).abs()
    }
}

/// Raw policy output.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, derive_more::From)]
pub struct Decision(f64);

impl Decision {
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// Decisions at or above the threshold flap; everything below is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionThreshold(f64);

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self(0.4)
    }
}

impl DecisionThreshold {
    pub fn new(value: f64) -> Result<Self, ConfigurationError> {
        let this = Self(value);
        this.validate()?;
        Ok(this)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    pub(crate) fn validate(self) -> Result<(), ConfigurationError> {
        if !self.0.is_finite() {
            return Err(ConfigurationError::InvalidThreshold { value: self.0 });
        }
        Ok(())
    }

    #[must_use]
    pub fn action(self, decision: Decision) -> Option<Action> {
        (decision.value() >= self.0).then_some(Action::Flap)
    }
}

/// A pure, side-effect-free decision function.
pub trait Policy {
    fn activate(&self, observation: &Observation) -> Decision;
}

impl<P> Policy for &P
where
    P: Policy + ?Sized,
{
    fn activate(&self, observation: &Observation) -> Decision {
        (**self).activate(observation)
    }
}

/// Candidate description supplied by the optimizer.
///
/// The orchestrator builds one policy per candidate per generation and drops it when the
/// candidate's evaluation ends.
pub trait PolicyDescription: Sync {
    type Policy: Policy;
    type Error: Error + Send + Sync + 'static;

    fn build_policy(&self) -> Result<Self::Policy, Self::Error>;
}

/// Adapts a closure into both a [`Policy`] and a [`PolicyDescription`].
#[derive(Debug, Clone, Copy)]
pub struct FnPolicy<F>(pub F);

impl<F> Policy for FnPolicy<F>
where
    F: Fn(&Observation) -> Decision,
{
    fn activate(&self, observation: &Observation) -> Decision {
        (self.0)(observation)
    }
}

impl<F> PolicyDescription for FnPolicy<F>
where
    F: Fn(&Observation) -> Decision + Clone + Sync,
{
    type Policy = Self;
    type Error = Infallible;

    fn build_policy(&self) -> Result<Self::Policy, Self::Error> {
        Ok(self.clone())
    }
}
