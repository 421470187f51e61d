use std::path::PathBuf;

use anyhow::{Context as _, ensure};
use chrono::Utc;
use flapevo_evaluator::{
    orchestrator::EvaluationOrchestrator, scenario::ScenarioSet,
    statistics::GenerationStatisticsTracker,
};
use flapevo_training::{
    genetic::{Population, PopulationEvolver},
    network::NetworkLayout,
};
use rand::SeedableRng as _;
use rand_pcg::Pcg64;

use crate::{config::RunConfig, model::policy_model::PolicyModel, util::Output};

const POPULATION_COUNT: usize = 30;
const MAX_GENERATIONS: usize = 100;
const HIDDEN_UNITS: usize = 8;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
enum EvolutionPhase {
    #[default]
    Exploration,
    Transition,
    Convergence,
}

impl EvolutionPhase {
    fn from_generation(generation: usize) -> Self {
        match generation {
            0..20 => Self::Exploration,
            20..60 => Self::Transition,
            _ => Self::Convergence,
        }
    }
}

const ELITE_COUNT: usize = 2;
const TOURNAMENT_SIZE: usize = 3;

const fn max_weight_by_phase(phase: EvolutionPhase) -> f64 {
    match phase {
        EvolutionPhase::Exploration => 2.0,
        EvolutionPhase::Transition => 3.0,
        EvolutionPhase::Convergence => 4.0,
    }
}

const MUTATION_RATE: f64 = 0.2;
const fn mutation_sigma_by_phase(phase: EvolutionPhase) -> f64 {
    match phase {
        EvolutionPhase::Exploration => 0.5,
        EvolutionPhase::Transition => 0.2,
        EvolutionPhase::Convergence => 0.05,
    }
}

const BLX_ALPHA: f64 = 0.3;

const fn evolver_by_phase(phase: EvolutionPhase) -> PopulationEvolver {
    PopulationEvolver {
        elite_count: ELITE_COUNT,
        tournament_size: TOURNAMENT_SIZE,
        max_weight: max_weight_by_phase(phase),
        mutation_sigma: mutation_sigma_by_phase(phase),
        blx_alpha: BLX_ALPHA,
        mutation_rate: MUTATION_RATE,
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Run configuration file (see `default-config`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Model name stored in the output
    #[arg(long, default_value = "flapevo")]
    name: String,
    #[arg(long, default_value_t = MAX_GENERATIONS)]
    generations: usize,
    #[arg(long, default_value_t = POPULATION_COUNT)]
    population: usize,
    #[arg(long, default_value_t = HIDDEN_UNITS)]
    hidden_units: usize,
    /// Seed of the genetic algorithm; random if omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the trained model
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output file path for the generation history
    #[arg(long)]
    history: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    ensure!(arg.generations > 0, "at least one generation is required");
    ensure!(arg.population > 0, "population must not be empty");

    let config = RunConfig::load(arg.config.as_deref())?;
    let scenarios =
        ScenarioSet::generate(&config.scenarios).context("Invalid scenario configuration")?;
    let orchestrator = EvaluationOrchestrator::new(scenarios, &config.evaluation, || {
        config.new_env()
    })
    .context("Invalid evaluation configuration")?;
    tracing::info!(
        scenarios = orchestrator.scenarios().len(),
        workers = orchestrator.worker_count().get(),
        population = arg.population,
        generations = arg.generations,
        "training started"
    );

    let mut rng = match arg.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_rng(&mut rand::rng()),
    };
    let layout = NetworkLayout::new(arg.hidden_units);
    let mut population = Population::random(
        layout,
        config.input_scale(),
        arg.population,
        &mut rng,
        max_weight_by_phase(EvolutionPhase::default()),
    );
    let mut tracker = GenerationStatisticsTracker::new();

    for generation in 0..arg.generations {
        let phase = EvolutionPhase::from_generation(generation);
        let report = population.evaluate_fitness(&orchestrator, &mut tracker)?;

        for ind in population.individuals() {
            tracing::debug!(id = %ind.id(), fitness = ind.fitness(), "individual");
        }

        let weight_stats = population.compute_weight_stats();
        #[expect(clippy::cast_precision_loss)]
        let weight_norm_std_dev_mean = weight_stats
            .iter()
            .map(|s| s.normalized_std_dev)
            .sum::<f64>()
            / weight_stats.len() as f64;
        let record = report.record();
        tracing::info!(
            generation,
            phase = ?phase,
            min_fitness = population.compute_fitness_stats().map(|s| s.min),
            mean_fitness = record.mean_fitness,
            max_fitness = record.max_fitness,
            fitness_std_dev = record.fitness_std_dev,
            max_raw_score = record.max_raw_score,
            weight_diversity = weight_norm_std_dev_mean,
            "generation summary"
        );

        if generation + 1 < arg.generations {
            population = evolver_by_phase(phase).evolve(&population, &mut rng);
        }
    }

    let best = population.best().context("Population is empty")?;
    let model = PolicyModel {
        name: arg.name.clone(),
        trained_at: Utc::now(),
        final_fitness: best.fitness(),
        hidden_units: layout.hidden_units,
        input_scale: best.genome().input_scale(),
        weights: best.weights().to_vec(),
    };
    Output::save_json(&model, arg.output.clone())?;
    if let Some(path) = &arg.history {
        Output::save_json(tracker.history(), Some(path.clone()))?;
    }

    tracing::info!(
        name = %model.name,
        trained_at = %model.trained_at,
        final_fitness = model.final_fitness,
        weights = model.weights.len(),
        path = ?arg.output,
        "model saved"
    );

    Ok(())
}
