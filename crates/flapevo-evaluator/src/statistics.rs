//! Per-generation statistics and their append-only history.
//!
//! After every candidate of a generation is evaluated, the population is reduced to a
//! [`PopulationSummary`]. The [`GenerationStatisticsTracker`] stamps it with the next
//! generation index and appends it as a [`GenerationRecord`]. Records are never mutated or
//! removed, so `history()[i].generation_index == i` always holds.
//!
//! All reductions go through [`DescriptiveStats`], which sorts its input and uses
//! compensated summation: the same population produces the same record regardless of the
//! order in which workers finished.

use flapevo_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::{
    error::EmptyGenerationError,
    orchestrator::{CandidateEvaluation, CandidateId},
};

/// Population-wide statistics of one generation, before it is indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationSummary {
    pub candidate_count: usize,
    pub faulted_count: usize,
    pub fitness: DescriptiveStats,
    pub raw_score: DescriptiveStats,
    pub best_candidate_id: CandidateId,
}

impl PopulationSummary {
    /// Reduces the evaluations of one generation.
    ///
    /// The raw score of a candidate is the mean of its per-scenario raw scores. The best
    /// candidate is the one with the highest fitness; ties go to the smallest id.
    pub fn from_evaluations(
        evaluations: &[CandidateEvaluation],
    ) -> Result<Self, EmptyGenerationError> {
        let fitness = DescriptiveStats::new(evaluations.iter().map(CandidateEvaluation::fitness))
            .ok_or(EmptyGenerationError)?;
        let raw_score =
            DescriptiveStats::new(evaluations.iter().map(CandidateEvaluation::raw_score))
                .ok_or(EmptyGenerationError)?;
        let best = evaluations
            .iter()
            .max_by(|a, b| {
                a.fitness()
                    .total_cmp(&b.fitness())
                    .then_with(|| b.candidate_id().cmp(&a.candidate_id()))
            })
            .ok_or(EmptyGenerationError)?;
        Ok(Self {
            candidate_count: evaluations.len(),
            faulted_count: evaluations.iter().filter(|e| e.fault().is_some()).count(),
            fitness,
            raw_score,
            best_candidate_id: best.candidate_id(),
        })
    }
}

/// Summary of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation_index: usize,
    pub candidate_count: usize,
    /// Candidates whose fitness was assigned after a fault.
    pub faulted_count: usize,
    pub mean_fitness: f64,
    pub max_fitness: f64,
    pub fitness_std_dev: f64,
    pub mean_raw_score: f64,
    pub max_raw_score: f64,
    pub best_candidate_id: CandidateId,
}

impl GenerationRecord {
    fn new(generation_index: usize, summary: &PopulationSummary) -> Self {
        Self {
            generation_index,
            candidate_count: summary.candidate_count,
            faulted_count: summary.faulted_count,
            mean_fitness: summary.fitness.mean,
            max_fitness: summary.fitness.max,
            fitness_std_dev: summary.fitness.std_dev,
            mean_raw_score: summary.raw_score.mean,
            max_raw_score: summary.raw_score.max,
            best_candidate_id: summary.best_candidate_id,
        }
    }
}

/// Append-only log of [`GenerationRecord`]s in generation order.
#[derive(Debug, Default, Clone)]
pub struct GenerationStatisticsTracker {
    history: Vec<GenerationRecord>,
}

impl GenerationStatisticsTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next generation and returns its record.
    pub fn append(&mut self, summary: &PopulationSummary) -> &GenerationRecord {
        let record = GenerationRecord::new(self.history.len(), summary);
        self.history.push(record);
        &self.history[self.history.len() - 1]
    }

    /// All records, oldest first.
    #[must_use]
    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    #[must_use]
    pub fn latest(&self) -> Option<&GenerationRecord> {
        self.history.last()
    }

    /// Index the next appended record will get.
    #[must_use]
    pub fn next_generation_index(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
