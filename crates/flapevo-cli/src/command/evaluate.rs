use std::path::PathBuf;

use anyhow::Context as _;
use flapevo_engine::FramePacing;
use flapevo_evaluator::{
    orchestrator::{CandidateEvaluation, CandidateId, EvaluationOrchestrator},
    scenario::ScenarioSet,
};
use serde::Serialize;

use crate::{
    config::RunConfig,
    model::policy_model::PolicyModel,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Pacing {
    #[default]
    Fast,
    Realtime,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Trained model file
    #[arg(long)]
    model: PathBuf,
    /// Run configuration file (see `default-config`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Step pacing: `fast` or `realtime`
    #[arg(long, default_value = "fast")]
    pacing: Pacing,
    /// Frames per second in realtime pacing
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationSummary<'a> {
    model: &'a str,
    #[serde(flatten)]
    evaluation: &'a CandidateEvaluation,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let model: PolicyModel = util::read_json_file("policy model", &arg.model)?;
    let genome = model.to_genome()?;

    let config = RunConfig::load(arg.config.as_deref())?;
    let scenarios =
        ScenarioSet::generate(&config.scenarios).context("Invalid scenario configuration")?;
    let pacing = match arg.pacing {
        Pacing::Fast => FramePacing::Fast,
        Pacing::Realtime => FramePacing::Realtime { fps: arg.fps },
    };
    let new_env = || config.new_env().with_pacing(pacing);
    let orchestrator = EvaluationOrchestrator::new(scenarios, &config.evaluation, new_env)
        .context("Invalid evaluation configuration")?;

    tracing::info!(
        model = %model.name,
        trained_at = %model.trained_at,
        scenarios = orchestrator.scenarios().len(),
        pacing = ?pacing,
        "evaluating model"
    );
    let mut env = new_env();
    let evaluation = orchestrator.evaluate_candidate(&mut env, CandidateId::from(0), &genome)?;
    for (index, (outcome, score)) in evaluation
        .outcomes()
        .iter()
        .zip(evaluation.normalized_scores())
        .enumerate()
    {
        tracing::info!(
            scenario = index,
            termination = ?outcome.termination(),
            raw_score = outcome.raw_score(),
            steps = outcome.survival_distance(),
            score,
            "scenario finished"
        );
    }
    tracing::info!(fitness = evaluation.fitness(), "evaluation finished");

    Output::save_json(
        &EvaluationSummary {
            model: &model.name,
            evaluation: &evaluation,
        },
        arg.output.clone(),
    )
}
