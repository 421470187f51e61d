//! Error taxonomy of the evaluation engine.
//!
//! | error | raised when | fatal to |
//! |-------|-------------|----------|
//! | [`ConfigurationError`] | weights, scenarios or constants are malformed | the run |
//! | [`EmptyGenerationError`] | a generation has no candidates | the generation call |
//! | [`CandidateFault`] | a policy cannot be built or the environment faults | one candidate, or the generation under [`FaultPolicy::AbortGeneration`](crate::config::FaultPolicy::AbortGeneration) |
//!
//! Step-limit exhaustion is not an error; see
//! [`Termination::Exhausted`](crate::episode_runner::Termination::Exhausted).

use flapevo_engine::EnvironmentFault;

use crate::orchestrator::CandidateId;

/// Malformed or inconsistent evaluation configuration.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("{weights} scenario weights given for {scenarios} scenarios")]
    ScenarioWeightCountMismatch { weights: usize, scenarios: usize },
    #[display("scenario weights must sum to a positive value, got {sum}")]
    NonPositiveWeightSum { sum: f64 },
    #[display("scenario weight #{index} must be finite and non-negative, got {value}")]
    InvalidWeight { index: usize, value: f64 },
    #[display("scenario set is empty")]
    EmptyScenarioSet,
    #[display("scenario #{scenario} has an empty gap sequence")]
    EmptyGapSequence { scenario: usize },
    #[display("scenario #{scenario} has a zero target count")]
    ZeroTargetCount { scenario: usize },
    #[display("normalizer constant `{name}` is invalid: {value}")]
    InvalidNormalizerConstant { name: &'static str, value: f64 },
    #[display("episode step limit must be positive")]
    ZeroStepLimit,
    #[display("decision threshold must be finite, got {value}")]
    InvalidThreshold { value: f64 },
    #[display("fault fitness must be finite, got {value}")]
    InvalidFaultFitness { value: f64 },
}

/// A generation was submitted with no candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("generation has no candidates")]
pub struct EmptyGenerationError;

/// What went wrong while evaluating a single candidate.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum CandidateFaultKind {
    #[display("policy could not be built: {message}")]
    Policy { message: String },
    #[display("{_0}")]
    Environment(EnvironmentFault),
}

/// Evaluation of one candidate failed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("candidate {candidate_id} failed: {kind}")]
pub struct CandidateFault {
    candidate_id: CandidateId,
    #[error(source)]
    kind: CandidateFaultKind,
}

impl CandidateFault {
    #[must_use]
    pub fn new(candidate_id: CandidateId, kind: CandidateFaultKind) -> Self {
        Self { candidate_id, kind }
    }

    pub fn policy(candidate_id: CandidateId, error: &dyn std::error::Error) -> Self {
        Self::new(
            candidate_id,
            CandidateFaultKind::Policy {
                message: error.to_string(),
            },
        )
    }

    #[must_use]
    pub fn environment(candidate_id: CandidateId, fault: EnvironmentFault) -> Self {
        Self::new(candidate_id, CandidateFaultKind::Environment(fault))
    }

    #[must_use]
    pub fn candidate_id(&self) -> CandidateId {
        self.candidate_id
    }

    #[must_use]
    pub fn kind(&self) -> &CandidateFaultKind {
        &self.kind
    }
}

/// Any failure of [`EvaluationOrchestrator::evaluate_generation`](crate::orchestrator::EvaluationOrchestrator::evaluate_generation).
///
/// Configuration problems are not listed: they are reported by
/// [`EvaluationOrchestrator::new`](crate::orchestrator::EvaluationOrchestrator::new) as a
/// [`ConfigurationError`] before any generation runs.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvaluationError {
    #[display("{_0}")]
    EmptyGeneration(EmptyGenerationError),
    #[display("{_0}")]
    Candidate(CandidateFault),
}
