//! Per-generation evaluation entry point.
//!
//! [`EvaluationOrchestrator::evaluate_generation`] takes an ordered batch of candidates,
//! evaluates every one of them against the whole [`ScenarioSet`], writes the resulting
//! fitness back onto each candidate, and appends one
//! [`GenerationRecord`](crate::statistics::GenerationRecord) to the tracker.
//!
//! # Parallelism
//!
//! Candidates are independent, so they are spread across a scoped worker pool. Every worker
//! builds its own environment from the factory and never shares it; within one candidate
//! the scenarios run sequentially in set order. Results land in per-candidate slots, so the
//! order in which workers finish has no effect on the output.
//!
//! # Faults
//!
//! A policy that cannot be built or an environment that faults fails a single candidate.
//! The generation always runs to completion first; then the configured
//! [`FaultPolicy`] either aborts with the first fault in candidate order (no fitness is
//! written back) or assigns the configured fitness to every faulted candidate.

use std::{
    iter,
    num::NonZeroUsize,
    panic,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

use flapevo_engine::{Environment, EnvironmentFault};
use flapevo_stats::summation;
use serde::{Deserialize, Serialize};

use crate::{
    config::{EvaluationConfig, FaultPolicy},
    episode_runner::{EpisodeOutcome, EpisodeRunner},
    error::{CandidateFault, ConfigurationError, EmptyGenerationError, EvaluationError},
    fitness_aggregator::FitnessAggregator,
    policy::PolicyDescription,
    scenario::ScenarioSet,
    score_normalizer::{ScenarioConstants, ScoreNormalizer},
    statistics::{GenerationRecord, GenerationStatisticsTracker, PopulationSummary},
};

/// Identifier of a candidate, unique within a run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[display("#{_0}")]
#[serde(transparent)]
pub struct CandidateId(u64);

impl CandidateId {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// One entry of a generation batch.
#[derive(Debug, Clone)]
pub struct Candidate<D> {
    id: CandidateId,
    description: D,
    fitness: Option<f64>,
}

impl<D> Candidate<D> {
    #[must_use]
    pub fn new(id: CandidateId, description: D) -> Self {
        Self {
            id,
            description,
            fitness: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> CandidateId {
        self.id
    }

    #[must_use]
    pub fn description(&self) -> &D {
        &self.description
    }

    /// Fitness of the last evaluated generation, or `None` if never evaluated.
    #[must_use]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    #[must_use]
    pub fn into_description(self) -> D {
        self.description
    }
}

/// Full evaluation record of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvaluation {
    candidate_id: CandidateId,
    outcomes: Vec<EpisodeOutcome>,
    normalized_scores: Vec<f64>,
    fitness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fault: Option<String>,
}

impl CandidateEvaluation {
    #[must_use]
    pub fn new(
        candidate_id: CandidateId,
        outcomes: Vec<EpisodeOutcome>,
        normalized_scores: Vec<f64>,
        fitness: f64,
    ) -> Self {
        Self {
            candidate_id,
            outcomes,
            normalized_scores,
            fitness,
            fault: None,
        }
    }

    /// Record of a candidate whose evaluation faulted and was assigned `fitness`.
    #[must_use]
    pub fn faulted(fault: &CandidateFault, fitness: f64) -> Self {
        Self {
            candidate_id: fault.candidate_id(),
            outcomes: vec![],
            normalized_scores: vec![],
            fitness,
            fault: Some(fault.kind().to_string()),
        }
    }

    #[must_use]
    pub fn candidate_id(&self) -> CandidateId {
        self.candidate_id
    }

    /// One outcome per scenario, in scenario order. Empty for faulted candidates.
    #[must_use]
    pub fn outcomes(&self) -> &[EpisodeOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn normalized_scores(&self) -> &[f64] {
        &self.normalized_scores
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Mean raw score over scenarios; zero for faulted candidates.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn raw_score(&self) -> f64 {
        summation::mean(self.outcomes.iter().map(|o| o.raw_score() as f64)).unwrap_or(0.0)
    }
}

/// Result of one [`EvaluationOrchestrator::evaluate_generation`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    evaluations: Vec<CandidateEvaluation>,
    record: GenerationRecord,
}

impl GenerationReport {
    /// Evaluations in candidate order.
    #[must_use]
    pub fn evaluations(&self) -> &[CandidateEvaluation] {
        &self.evaluations
    }

    /// The record appended to the tracker.
    #[must_use]
    pub fn record(&self) -> &GenerationRecord {
        &self.record
    }
}

/// Evaluates generations of candidates against a fixed scenario set.
///
/// All configuration is validated by [`new`](Self::new); once constructed, the scenario
/// set, weights and constants stay fixed for the lifetime of the orchestrator.
#[derive(Debug)]
pub struct EvaluationOrchestrator<F> {
    scenarios: ScenarioSet,
    runner: EpisodeRunner,
    normalizer: ScoreNormalizer,
    aggregator: FitnessAggregator,
    fault_policy: FaultPolicy,
    worker_count: NonZeroUsize,
    env_factory: F,
}

impl<F, E> EvaluationOrchestrator<F>
where
    F: Fn() -> E + Sync,
    E: Environment,
{
    /// Creates an orchestrator.
    ///
    /// `env_factory` is called once per worker thread per generation.
    pub fn new(
        scenarios: ScenarioSet,
        config: &EvaluationConfig,
        env_factory: F,
    ) -> Result<Self, ConfigurationError> {
        config.validate(&scenarios)?;
        Ok(Self {
            runner: EpisodeRunner::new(config.decision_threshold, config.max_steps_per_episode),
            normalizer: config.normalizer,
            aggregator: FitnessAggregator::new(config.scenario_weights.clone())?,
            fault_policy: config.fault_policy,
            worker_count: config.resolved_worker_count(),
            scenarios,
            env_factory,
        })
    }

    #[must_use]
    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    #[must_use]
    pub fn worker_count(&self) -> NonZeroUsize {
        self.worker_count
    }

    /// Evaluates one candidate on `env` against every scenario, in scenario order.
    ///
    /// The environment is reset before each scenario, so any environment instance can be
    /// passed in regardless of its previous state.
    pub fn evaluate_candidate<Env, D>(
        &self,
        env: &mut Env,
        candidate_id: CandidateId,
        description: &D,
    ) -> Result<CandidateEvaluation, CandidateFault>
    where
        Env: Environment + ?Sized,
        D: PolicyDescription + ?Sized,
    {
        let _span = tracing::debug_span!("candidate", %candidate_id).entered();

        let policy = description
            .build_policy()
            .map_err(|e| CandidateFault::policy(candidate_id, &e))?;

        let environment_height = env.height();
        if !(environment_height.is_finite() && environment_height > 0.0) {
            return Err(CandidateFault::environment(
                candidate_id,
                EnvironmentFault::new(format!(
                    "environment height must be positive, got {environment_height}"
                )),
            ));
        }

        let mut outcomes = Vec::with_capacity(self.scenarios.len());
        let mut normalized_scores = Vec::with_capacity(self.scenarios.len());
        for (index, scenario) in self.scenarios.iter().enumerate() {
            env.reset_with_scenario(scenario.gaps(), scenario.target_count());
            let outcome = self
                .runner
                .run(env, &policy, scenario)
                .map_err(|fault| CandidateFault::environment(candidate_id, fault))?;

            let score = self.normalizer.normalize(
                &outcome,
                ScenarioConstants {
                    target_count: scenario.target_count(),
                    environment_height,
                },
            );
            tracing::debug!(
                scenario = index,
                termination = ?outcome.termination(),
                raw_score = outcome.raw_score(),
                steps = outcome.survival_distance(),
                score,
                "episode finished"
            );
            outcomes.push(outcome);
            normalized_scores.push(score);
        }

        let fitness = self
            .aggregator
            .aggregate(&normalized_scores)
            .expect("aggregator weights are validated against the scenario set");
        Ok(CandidateEvaluation::new(
            candidate_id,
            outcomes,
            normalized_scores,
            fitness,
        ))
    }

    /// Evaluates a whole generation and records its statistics.
    ///
    /// On success every candidate's fitness is updated and one record is appended to
    /// `tracker`. On failure neither the candidates nor the tracker are touched.
    pub fn evaluate_generation<D>(
        &self,
        candidates: &mut [Candidate<D>],
        tracker: &mut GenerationStatisticsTracker,
    ) -> Result<GenerationReport, EvaluationError>
    where
        D: PolicyDescription,
    {
        if candidates.is_empty() {
            return Err(EmptyGenerationError.into());
        }

        let generation_index = tracker.next_generation_index();
        let results = self.evaluate_all(candidates);

        let mut evaluations = Vec::with_capacity(results.len());
        for result in results {
            match (result, self.fault_policy) {
                (Ok(evaluation), _) => evaluations.push(evaluation),
                (Err(fault), FaultPolicy::AbortGeneration) => {
                    tracing::error!(generation_index, %fault, "aborting generation");
                    return Err(fault.into());
                }
                (Err(fault), FaultPolicy::AssignFitness(fitness)) => {
                    tracing::warn!(generation_index, %fault, fitness, "assigning fault fitness");
                    evaluations.push(CandidateEvaluation::faulted(&fault, fitness));
                }
            }
        }

        for (candidate, evaluation) in iter::zip(candidates.iter_mut(), &evaluations) {
            candidate.set_fitness(evaluation.fitness());
        }

        let summary = PopulationSummary::from_evaluations(&evaluations)?;
        let record = tracker.append(&summary).clone();
        tracing::info!(
            generation_index = record.generation_index,
            candidates = record.candidate_count,
            faulted = record.faulted_count,
            mean_fitness = record.mean_fitness,
            max_fitness = record.max_fitness,
            mean_raw_score = record.mean_raw_score,
            best = %record.best_candidate_id,
            "generation evaluated"
        );

        Ok(GenerationReport {
            evaluations,
            record,
        })
    }

    /// Runs [`evaluate_candidate`](Self::evaluate_candidate) for every candidate on the
    /// worker pool and returns the results in candidate order.
    fn evaluate_all<D>(
        &self,
        candidates: &[Candidate<D>],
    ) -> Vec<Result<CandidateEvaluation, CandidateFault>>
    where
        D: PolicyDescription,
    {
        let worker_count = self.worker_count.get().min(candidates.len());
        let next_index = &AtomicUsize::new(0);
        let mut slots = iter::repeat_with(|| None)
            .take(candidates.len())
            .collect::<Vec<_>>();

        thread::scope(|s| {
            let mut workers = Vec::with_capacity(worker_count);
            for _ in 0..worker_count {
                workers.push(s.spawn(move || {
                    let mut env = (self.env_factory)();
                    let mut done = vec![];
                    loop {
                        let index = next_index.fetch_add(1, Ordering::Relaxed);
                        let Some(candidate) = candidates.get(index) else {
                            break;
                        };
                        let result =
                            self.evaluate_candidate(&mut env, candidate.id(), candidate.description());
                        done.push((index, result));
                    }
                    done
                }));
            }

            for worker in workers {
                match worker.join() {
                    Ok(done) => {
                        for (index, result) in done {
                            slots[index] = Some(result);
                        }
                    }
                    Err(payload) => panic::resume_unwind(payload),
                }
            }
        });

        slots
            .into_iter()
            .map(|slot| slot.expect("every candidate index is claimed by exactly one worker"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use flapevo_engine::{Action, EnvState, FlappyEnv};

    use super::*;
    use crate::{
        episode_runner::Termination,
        policy::{Decision, FnPolicy, Observation},
        scenario::{Scenario, ScenarioSetConfig},
    };

    fn hover(o: &Observation) -> Decision {
        Decision::from(if o.player_y() + 24.0 > o.gap_bottom_y() - 15.0 {
            1.0
        } else {
            0.0
        })
    }

    fn idle(_: &Observation) -> Decision {
        Decision::from(0.0)
    }

    fn small_scenarios() -> ScenarioSet {
        ScenarioSet::new(vec![
            Scenario::new(vec![20, 60, 40], 2),
            Scenario::new(vec![100, 10, 150, 80], 3),
            Scenario::new(vec![200, 0, 120, 250, 30], 4),
        ])
        .unwrap()
    }

    fn config(worker_count: usize) -> EvaluationConfig {
        EvaluationConfig {
            max_steps_per_episode: 5_000,
            worker_count: NonZeroUsize::new(worker_count),
            ..EvaluationConfig::default()
        }
    }

    fn candidates() -> Vec<Candidate<FnPolicy<fn(&Observation) -> Decision>>> {
        let policies: [fn(&Observation) -> Decision; 4] = [hover, idle, hover, idle];
        (0..)
            .zip(policies)
            .map(|(id, f)| Candidate::new(CandidateId::from(id), FnPolicy(f)))
            .collect()
    }

    /// Environment whose state query always fails.
    #[derive(Debug, Default)]
    struct FaultyEnv;

    impl Environment for FaultyEnv {
        fn init(&mut self) {}
        fn reset_with_scenario(&mut self, _gaps: &[u32], _target_count: usize) {}
        fn state(&self) -> Result<EnvState, EnvironmentFault> {
            Err(EnvironmentFault::new("broken sensor"))
        }
        fn act(&mut self, _action: Option<Action>) -> f64 {
            0.0
        }
        fn is_terminal(&self) -> bool {
            false
        }
        fn height(&self) -> f64 {
            512.0
        }
    }

    /// Environment that never ends an episode. It passes one obstacle per step when the
    /// scenario's first gap is non-zero.
    #[derive(Debug)]
    struct StallingEnv {
        rewarding: bool,
        steps: usize,
        height: f64,
    }

    impl Default for StallingEnv {
        fn default() -> Self {
            Self {
                rewarding: false,
                steps: 0,
                height: 512.0,
            }
        }
    }

    impl Environment for StallingEnv {
        fn init(&mut self) {}
        fn reset_with_scenario(&mut self, gaps: &[u32], _target_count: usize) {
            self.rewarding = gaps.first().is_some_and(|g| *g > 0);
        }
        fn state(&self) -> Result<EnvState, EnvironmentFault> {
            Ok(EnvState {
                player_y: 110.0,
                player_velocity: 0.0,
                next_gap_top_y: 50.0,
                next_gap_bottom_y: 150.0,
                next_obstacle_distance: 10.0,
            })
        }
        fn act(&mut self, _action: Option<Action>) -> f64 {
            self.steps += 1;
            if self.rewarding { 1.0 } else { 0.0 }
        }
        fn is_terminal(&self) -> bool {
            false
        }
        fn height(&self) -> f64 {
            self.height
        }
    }

    fn stalling_orchestrator() -> EvaluationOrchestrator<fn() -> StallingEnv> {
        let scenarios =
            ScenarioSet::new(vec![Scenario::new(vec![0], 3), Scenario::new(vec![1], 2)]).unwrap();
        let config = EvaluationConfig {
            max_steps_per_episode: 50,
            scenario_weights: vec![1.0, 1.0],
            ..config(1)
        };
        EvaluationOrchestrator::new(scenarios, &config, StallingEnv::default as fn() -> StallingEnv)
            .unwrap()
    }

    /// Description that never builds.
    #[derive(Debug)]
    struct Unbuildable;

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    #[display("no weights")]
    struct NoWeights;

    impl PolicyDescription for Unbuildable {
        type Policy = FnPolicy<fn(&Observation) -> Decision>;
        type Error = NoWeights;

        fn build_policy(&self) -> Result<Self::Policy, Self::Error> {
            Err(NoWeights)
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let orchestrator =
            EvaluationOrchestrator::new(small_scenarios(), &config(2), FlappyEnv::new).unwrap();

        let mut first = candidates();
        let mut second = candidates();
        let a = orchestrator
            .evaluate_generation(&mut first, &mut GenerationStatisticsTracker::new())
            .unwrap();
        let b = orchestrator
            .evaluate_generation(&mut second, &mut GenerationStatisticsTracker::new())
            .unwrap();
        assert_eq!(a, b);
        for (x, y) in iter::zip(&first, &second) {
            assert_eq!(x.fitness(), y.fitness());
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential =
            EvaluationOrchestrator::new(small_scenarios(), &config(1), FlappyEnv::new).unwrap();
        let parallel =
            EvaluationOrchestrator::new(small_scenarios(), &config(8), FlappyEnv::new).unwrap();

        let a = sequential
            .evaluate_generation(&mut candidates(), &mut GenerationStatisticsTracker::new())
            .unwrap();
        let b = parallel
            .evaluate_generation(&mut candidates(), &mut GenerationStatisticsTracker::new())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fitness_is_written_back_in_candidate_order() {
        let orchestrator =
            EvaluationOrchestrator::new(small_scenarios(), &config(3), FlappyEnv::new).unwrap();
        let mut candidates = candidates();
        let mut tracker = GenerationStatisticsTracker::new();
        let report = orchestrator
            .evaluate_generation(&mut candidates, &mut tracker)
            .unwrap();

        assert_eq!(report.evaluations().len(), candidates.len());
        for (candidate, evaluation) in iter::zip(&candidates, report.evaluations()) {
            assert_eq!(candidate.id(), evaluation.candidate_id());
            assert_eq!(candidate.fitness(), Some(evaluation.fitness()));
            assert_eq!(evaluation.outcomes().len(), 3);
            assert_eq!(evaluation.normalized_scores().len(), 3);
        }
        // The hovering candidates outperform the idle ones
        assert!(candidates[0].fitness() > candidates[1].fitness());
        assert_eq!(candidates[0].fitness(), candidates[2].fitness());
        assert_eq!(report.record().best_candidate_id, CandidateId::from(0));
        assert_eq!(tracker.history(), std::slice::from_ref(report.record()));
    }

    #[test]
    fn test_generation_indices_follow_tracker() {
        let orchestrator =
            EvaluationOrchestrator::new(small_scenarios(), &config(2), FlappyEnv::new).unwrap();
        let mut tracker = GenerationStatisticsTracker::new();
        let mut candidates = candidates();
        for expected in 0..3 {
            let report = orchestrator
                .evaluate_generation(&mut candidates, &mut tracker)
                .unwrap();
            assert_eq!(report.record().generation_index, expected);
        }
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_empty_generation() {
        let orchestrator =
            EvaluationOrchestrator::new(small_scenarios(), &config(2), FlappyEnv::new).unwrap();
        let mut tracker = GenerationStatisticsTracker::new();
        let mut candidates: Vec<Candidate<FnPolicy<fn(&Observation) -> Decision>>> = vec![];
        let result = orchestrator.evaluate_generation(&mut candidates, &mut tracker);
        assert_eq!(
            result,
            Err(EvaluationError::EmptyGeneration(EmptyGenerationError))
        );
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_configuration_error_before_any_episode() {
        let created = AtomicUsize::new(0);
        let factory = || {
            created.fetch_add(1, Ordering::SeqCst);
            FlappyEnv::new()
        };
        let config = EvaluationConfig {
            scenario_weights: vec![1.0, 2.0],
            ..EvaluationConfig::default()
        };
        let result = EvaluationOrchestrator::new(small_scenarios(), &config, factory);
        assert_eq!(
            result.err(),
            Some(ConfigurationError::ScenarioWeightCountMismatch {
                weights: 2,
                scenarios: 3
            })
        );
        assert_eq!(created.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_environment_fault_aborts_generation() {
        let orchestrator =
            EvaluationOrchestrator::new(small_scenarios(), &config(2), FaultyEnv::default)
                .unwrap();
        let mut candidates = candidates();
        let mut tracker = GenerationStatisticsTracker::new();
        let result = orchestrator.evaluate_generation(&mut candidates, &mut tracker);

        let Err(EvaluationError::Candidate(fault)) = &result else {
            panic!("expected a candidate fault, got {result:?}");
        };
        assert_eq!(fault.candidate_id(), CandidateId::from(0));
        assert!(candidates.iter().all(|c| c.fitness().is_none()));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_assigned_fault_fitness() {
        let config = EvaluationConfig {
            fault_policy: FaultPolicy::AssignFitness(-1.0),
            ..config(2)
        };
        let orchestrator =
            EvaluationOrchestrator::new(small_scenarios(), &config, FlappyEnv::new).unwrap();
        let mut candidates = vec![
            Candidate::new(CandidateId::from(0), Unbuildable),
            Candidate::new(CandidateId::from(1), Unbuildable),
        ];
        let mut tracker = GenerationStatisticsTracker::new();
        let report = orchestrator
            .evaluate_generation(&mut candidates, &mut tracker)
            .unwrap();

        assert!(candidates.iter().all(|c| c.fitness() == Some(-1.0)));
        assert_eq!(report.record().faulted_count, 2);
        assert_eq!(report.record().mean_fitness, -1.0);
        assert_eq!(report.record().max_raw_score, 0.0);
        assert_eq!(
            report.evaluations()[0].fault(),
            Some("policy could not be built: no weights")
        );
    }

    #[test]
    fn test_assigned_fault_fitness_for_environment_fault() {
        let config = EvaluationConfig {
            fault_policy: FaultPolicy::AssignFitness(-2.5),
            ..config(2)
        };
        let orchestrator =
            EvaluationOrchestrator::new(small_scenarios(), &config, FaultyEnv::default).unwrap();
        let mut candidates = candidates();
        let mut tracker = GenerationStatisticsTracker::new();
        let report = orchestrator
            .evaluate_generation(&mut candidates, &mut tracker)
            .unwrap();

        assert!(candidates.iter().all(|c| c.fitness() == Some(-2.5)));
        assert_eq!(report.record().faulted_count, 4);
        assert_eq!(report.record().candidate_count, 4);
        assert_eq!(report.record().max_fitness, -2.5);
        assert_eq!(tracker.len(), 1);
        for evaluation in report.evaluations() {
            assert_eq!(evaluation.fault(), Some("environment fault: broken sensor"));
            assert!(evaluation.outcomes().is_empty());
        }
    }

    #[test]
    fn test_step_limit_only_ends_that_episode() {
        let orchestrator = stalling_orchestrator();
        let mut env = StallingEnv::default();
        let evaluation = orchestrator
            .evaluate_candidate(&mut env, CandidateId::from(0), &FnPolicy(idle))
            .unwrap();

        let outcomes = evaluation.outcomes();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].termination(), Termination::Exhausted);
        assert_eq!(outcomes[0].survival_distance(), 50);
        assert_eq!(outcomes[0].terminal_misalignment(), 10.0);
        assert_eq!(outcomes[1].termination(), Termination::TargetReached);
        assert_eq!(outcomes[1].raw_score(), 2);
        assert_eq!(outcomes[1].survival_distance(), 2);
        assert_eq!(env.steps, 52);
    }

    #[test]
    fn test_invalid_height_fails_before_stepping() {
        let orchestrator = stalling_orchestrator();
        let mut env = StallingEnv {
            height: 0.0,
            ..StallingEnv::default()
        };
        let fault = orchestrator
            .evaluate_candidate(&mut env, CandidateId::from(3), &FnPolicy(idle))
            .unwrap_err();
        assert_eq!(fault.candidate_id(), CandidateId::from(3));
        assert!(fault.kind().is_environment());
        assert_eq!(env.steps, 0);
    }

    #[test]
    fn test_policy_build_failure_is_candidate_fault() {
        let orchestrator =
            EvaluationOrchestrator::new(small_scenarios(), &config(1), FlappyEnv::new).unwrap();
        let mut env = FlappyEnv::new();
        let result = orchestrator.evaluate_candidate(&mut env, CandidateId::from(9), &Unbuildable);
        let fault = result.unwrap_err();
        assert_eq!(fault.candidate_id(), CandidateId::from(9));
        assert!(fault.kind().is_policy());
    }

    #[test]
    fn test_evaluate_candidate_ignores_previous_env_state() {
        let scenarios = ScenarioSet::generate(&ScenarioSetConfig::default()).unwrap();
        let orchestrator =
            EvaluationOrchestrator::new(scenarios, &config(1), FlappyEnv::new).unwrap();
        let hover = FnPolicy(hover as fn(&Observation) -> Decision);

        let mut fresh = FlappyEnv::new();
        let mut used = FlappyEnv::new();
        used.reset_with_scenario(&[250, 0], 1);
        for _ in 0..37 {
            used.act(Some(Action::Flap));
        }

        let a = orchestrator
            .evaluate_candidate(&mut fresh, CandidateId::from(0), &hover)
            .unwrap();
        let b = orchestrator
            .evaluate_candidate(&mut used, CandidateId::from(0), &hover)
            .unwrap();
        assert_eq!(a, b);
    }
}
