//! Training system evolving policy networks with a genetic algorithm.
//!
//! This crate is the optimizer on top of `flapevo-evaluator`: it proposes candidate
//! networks, hands them to the evaluator as one batch per generation, and breeds the next
//! generation from the fitness values it gets back.
//!
//! # Architecture
//!
//! ```text
//! Genetic Algorithm (genetic)
//!     ↓ evolves
//! Flat weight vectors (weights)
//!     ↓ materialized as
//! Feed-forward networks (network)
//!     ↓ scored by
//! Evaluation Orchestrator (flapevo-evaluator)
//!     ↓ produces
//! Fitness + GenerationRecord
//!     ↓ guides
//! Selection & Reproduction
//! ```
//!
//! # Modules
//!
//! - [`network`] - Network layout, forward pass and the genome handed to the evaluator
//! - [`weights`] - Initialization, crossover and mutation of flat weight vectors
//! - [`genetic`] - Individuals, populations and the evolution step

pub mod genetic;
pub mod network;
pub mod weights;
