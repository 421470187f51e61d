//! Episode logic for the reference environment.
//!
//! - [`FlappyEnv`] - Steppable side-scroller implementing [`Environment`](crate::Environment)
//! - [`FlappyConfig`] - Field geometry and physics constants
//! - [`EnvSeed`] - Seed for deterministic start-state randomization
//! - [`FramePacing`] - Unthrottled or realtime stepping
//!
//! # Episode Flow
//!
//! 1. [`reset_with_scenario`](crate::Environment::reset_with_scenario) loads a gap sequence
//! 2. Each [`act`](crate::Environment::act) applies gravity or a flap, scrolls obstacles,
//!    spawns the next obstacle from the gap sequence and credits passes
//! 3. The episode ends when the agent touches an obstacle, the ceiling or the floor

pub use self::{env_seed::*, flappy_env::*, frame_pacing::*};

mod env_seed;
mod flappy_env;
mod frame_pacing;
