//! Multi-scenario fitness evaluation for evolved side-scroller policies.
//!
//! This crate turns candidate policies into scalar fitness values. Each candidate is driven
//! through every scenario of a [`ScenarioSet`](scenario::ScenarioSet), and the raw episode
//! signals are reduced to one number the optimizer can rank by.
//!
//! # Architecture
//!
//! ```text
//! Evaluation Orchestrator (once per generation, parallel over candidates)
//!     ↓ per candidate, per scenario (sequential)
//! Episode Runner (policy ↔ environment loop → EpisodeOutcome)
//!     ↓
//! Score Normalizer (EpisodeOutcome → normalized score)
//!     ↓
//! Fitness Aggregator (weighted mean over scenarios → fitness)
//!     ↓ after all candidates
//! Generation Statistics Tracker (append-only GenerationRecord history)
//! ```
//!
//! # Modules
//!
//! - [`scenario`] - Scenario definitions and deterministic scenario-set generation
//! - [`policy`] - Observation, decision threshold and the policy seams
//! - [`episode_runner`] - Bounded episode loop and its three termination kinds
//! - [`score_normalizer`] - Outcome to normalized score
//! - [`fitness_aggregator`] - Weighted mean of per-scenario scores
//! - [`statistics`] - Generation records and their history
//! - [`orchestrator`] - Per-generation entry point with a worker pool
//! - [`config`] - Evaluation configuration and its validation
//! - [`error`] - Error taxonomy
//!
//! # Error Handling
//!
//! - Configuration problems are reported by
//!   [`EvaluationOrchestrator::new`](orchestrator::EvaluationOrchestrator::new) before any
//!   episode runs.
//! - An episode that hits the step limit is not an error: it ends with
//!   [`Termination::Exhausted`](episode_runner::Termination::Exhausted).
//! - Environment faults and policy construction failures fail a single candidate; the
//!   configured [`FaultPolicy`](config::FaultPolicy) decides whether that aborts the
//!   generation or assigns a fixed fitness.
//!
//! # Example
//!
//! ```
//! use flapevo_engine::FlappyEnv;
//! use flapevo_evaluator::{
//!     config::EvaluationConfig,
//!     orchestrator::{Candidate, CandidateId, EvaluationOrchestrator},
//!     policy::{Decision, FnPolicy, Observation},
//!     scenario::{ScenarioSet, ScenarioSetConfig},
//!     statistics::GenerationStatisticsTracker,
//! };
//!
//! let scenarios = ScenarioSet::generate(&ScenarioSetConfig::default()).unwrap();
//! let orchestrator =
//!     EvaluationOrchestrator::new(scenarios, &EvaluationConfig::default(), FlappyEnv::new)
//!         .unwrap();
//!
//! // A policy that never acts
//! let idle = FnPolicy(|_: &Observation| Decision::from(0.0));
//! let mut candidates = vec![Candidate::new(CandidateId::from(0), idle)];
//!
//! let mut tracker = GenerationStatisticsTracker::new();
//! let report = orchestrator
//!     .evaluate_generation(&mut candidates, &mut tracker)
//!     .unwrap();
//! assert_eq!(report.record().generation_index, 0);
//! assert!(candidates[0].fitness().is_some());
//! ```

pub mod config;
pub mod episode_runner;
pub mod error;
pub mod fitness_aggregator;
pub mod orchestrator;
pub mod policy;
pub mod scenario;
pub mod score_normalizer;
pub mod statistics;
