//! Genetic algorithm evolving network weights.
//!
//! Each generation:
//!
//! 1. **Evaluate Fitness** - The whole population is handed to the
//!    [`EvaluationOrchestrator`] as one batch
//! 2. **Elite Selection** - Top performers are carried over unchanged
//! 3. **Tournament Selection** - Parents are picked by small random tournaments
//! 4. **Crossover (BLX-α)** - Two parents' weights are blended into a child
//! 5. **Mutation** - Gaussian noise is added to some of the child's weights
//!
//! Every individual carries a [`CandidateId`]. Elites keep theirs; children get fresh ids,
//! so ids stay unique across the whole run.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut population = Population::random(layout, input_scale, 30, &mut rng, 1.0);
//! for generation in 0..100 {
//!     population.evaluate_fitness(&orchestrator, &mut tracker)?;
//!     population = evolver.evolve(&population, &mut rng);
//! }
//! ```

use flapevo_engine::Environment;
use flapevo_evaluator::{
    error::EvaluationError,
    orchestrator::{Candidate, CandidateId, EvaluationOrchestrator, GenerationReport},
    statistics::GenerationStatisticsTracker,
};
use flapevo_stats::descriptive::DescriptiveStats;
use rand::{Rng, seq::IndexedRandom};

use crate::{
    network::{NetworkGenome, NetworkLayout},
    weights,
};

/// A single candidate solution: a genome and its last evaluated fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    id: CandidateId,
    genome: NetworkGenome,
    fitness: f64,
}

impl Individual {
    /// Creates an individual with weights uniform in `[-max_weight, max_weight]`.
    pub fn random<R>(
        id: CandidateId,
        layout: NetworkLayout,
        input_scale: f64,
        rng: &mut R,
        max_weight: f64,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = weights::random(rng, max_weight, layout.weight_count());
        Self {
            id,
            genome: NetworkGenome::new(layout, input_scale, weights),
            fitness: f64::MIN,
        }
    }

    #[must_use]
    pub fn id(&self) -> CandidateId {
        self.id
    }

    #[must_use]
    pub fn genome(&self) -> &NetworkGenome {
        &self.genome
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        self.genome.weights()
    }

    /// Fitness of the last evaluation; `f64::MIN` before the first one.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// A population of individuals evaluated together.
#[derive(Debug, Clone)]
pub struct Population {
    layout: NetworkLayout,
    input_scale: f64,
    individuals: Vec<Individual>,
    next_id: u64,
}

impl Population {
    /// Creates `count` random individuals with ids `0..count`.
    #[must_use]
    pub fn random<R>(
        layout: NetworkLayout,
        input_scale: f64,
        count: usize,
        rng: &mut R,
        max_weight: f64,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut next_id = 0;
        let individuals = (0..count)
            .map(|_| {
                let id = CandidateId::from(next_id);
                next_id += 1;
                Individual::random(id, layout, input_scale, rng, max_weight)
            })
            .collect();
        Self {
            layout,
            input_scale,
            individuals,
            next_id,
        }
    }

    #[must_use]
    pub fn layout(&self) -> NetworkLayout {
        self.layout
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Best individual of the last evaluation.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Evaluates every individual as one generation.
    ///
    /// On success each individual gets its fitness and the population is sorted best
    /// first (ties by id). On failure the population is left unchanged.
    pub fn evaluate_fitness<F, E>(
        &mut self,
        orchestrator: &EvaluationOrchestrator<F>,
        tracker: &mut GenerationStatisticsTracker,
    ) -> Result<GenerationReport, EvaluationError>
    where
        F: Fn() -> E + Sync,
        E: Environment,
    {
        let mut candidates = self
            .individuals
            .iter()
            .map(|ind| Candidate::new(ind.id, ind.genome.clone()))
            .collect::<Vec<_>>();
        let report = orchestrator.evaluate_generation(&mut candidates, tracker)?;

        for (ind, candidate) in self.individuals.iter_mut().zip(&candidates) {
            if let Some(fitness) = candidate.fitness() {
                ind.fitness = fitness;
            }
        }
        self.individuals.sort_by(|a, b| {
            b.fitness
                .total_cmp(&a.fitness)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(report)
    }

    /// Per-weight statistics across the population, one entry per weight index.
    #[must_use]
    pub fn compute_weight_stats(&self) -> Vec<DescriptiveStats> {
        (0..self.layout.weight_count())
            .filter_map(|i| DescriptiveStats::new(self.individuals.iter().map(|ind| ind.weights()[i])))
            .collect()
    }

    /// Fitness statistics across the population, or `None` if it is empty.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }
}

/// Parameters of one evolution step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationEvolver {
    /// Number of top individuals carried over unchanged
    pub elite_count: usize,
    /// Weights are clamped to `[-max_weight, max_weight]`
    pub max_weight: f64,
    /// Individuals per tournament (larger = stronger selection pressure)
    pub tournament_size: usize,
    /// Standard deviation of the Gaussian mutation noise
    pub mutation_sigma: f64,
    /// BLX-α range expansion
    pub blx_alpha: f64,
    /// Per-weight mutation probability
    pub mutation_rate: f64,
}

impl PopulationEvolver {
    /// Creates the next generation, of the same size as `population`.
    ///
    /// # Panics
    ///
    /// Panics if `population` is not sorted by fitness, best first (as left by
    /// [`Population::evaluate_fitness`]).
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        assert!(
            population
                .individuals
                .is_sorted_by(|a, b| a.fitness >= b.fitness),
            "population must be sorted by fitness"
        );

        let count = population.individuals.len();
        let elite_count = self.elite_count.min(count);
        let mut next_id = population.next_id;
        let mut next_individuals = Vec::with_capacity(count);
        next_individuals.extend(population.individuals[..elite_count].iter().cloned());

        while next_individuals.len() < count {
            let p1 = tournament_select(&population.individuals, self.tournament_size, rng);
            let p2 = tournament_select(&population.individuals, self.tournament_size, rng);

            let mut child = weights::blx_alpha(
                p1.weights(),
                p2.weights(),
                self.blx_alpha,
                self.max_weight,
                rng,
            );
            weights::mutate(
                &mut child,
                self.mutation_sigma,
                self.max_weight,
                self.mutation_rate,
                rng,
            );

            next_individuals.push(Individual {
                id: CandidateId::from(next_id),
                genome: NetworkGenome::new(population.layout, population.input_scale, child),
                fitness: f64::MIN,
            });
            next_id += 1;
        }
        tracing::debug!(
            elites = elite_count,
            children = count - elite_count,
            next_id,
            "population evolved"
        );

        Population {
            layout: population.layout,
            input_scale: population.input_scale,
            individuals: next_individuals,
            next_id,
        }
    }
}

/// Picks `tournament_size` distinct individuals at random and returns the fittest.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    population
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .expect("tournament needs a non-empty population")
}
