//! Core geometry of the side-scrolling field.
//!
//! - [`Rect`] - Axis-aligned box used for collision tests
//! - [`Agent`] - The controlled body: vertical position and velocity
//! - [`Obstacle`] - A scrolling pipe pair with an opening
//!
//! These types know nothing about episodes or scenarios; [`FlappyEnv`](crate::FlappyEnv)
//! combines them into a steppable environment.

pub use self::{agent::*, obstacle::*, rect::*};

mod agent;
mod obstacle;
mod rect;
