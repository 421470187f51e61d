//! Side-scrolling obstacle environment for policy evaluation.
//!
//! This crate provides the environment collaborator used by the evaluator:
//!
//! - [`Environment`] - The contract the evaluator drives (init, reset, state query, step,
//!   termination check, height)
//! - [`FlappyEnv`] - A deterministic reference implementation: an agent falling under gravity
//!   that must flap through the openings of scrolling obstacles
//! - [`EnvSeed`] - Seed for the environment's start-state randomization
//! - [`FramePacing`] - Fast (unthrottled) or realtime stepping
//!
//! # Example
//!
//! ```
//! use flapevo_engine::{Action, Environment as _, FlappyEnv};
//!
//! let mut env = FlappyEnv::new();
//! env.reset_with_scenario(&[40, 80, 120], 3);
//!
//! let mut passed = 0;
//! while !env.is_terminal() {
//!     let state = env.state().unwrap();
//!     // flap when the agent's lower edge sinks towards the bottom of the opening
//!     let bottom = state.player_y + 24.0;
//!     let action = (bottom > state.next_gap_bottom_y - 15.0).then_some(Action::Flap);
//!     if env.act(action) > 0.0 {
//!         passed += 1;
//!     }
//!     if passed == 3 {
//!         break;
//!     }
//! }
//! ```

pub use self::{core::*, engine::*, environment::*};

pub mod core;
pub mod engine;
mod environment;
