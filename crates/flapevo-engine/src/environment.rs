/// Discrete action applied to the environment for one step.
///
/// "No action" is expressed as `None` at the call site of [`Environment::act`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Action {
    Flap,
}

/// Snapshot of the quantities a policy may observe.
///
/// All vertical positions are in environment units, growing downwards from the top
/// edge (y = 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvState {
    pub player_y: f64,
    pub player_velocity: f64,
    /// Upper edge of the next obstacle's opening.
    pub next_gap_top_y: f64,
    /// Lower edge of the next obstacle's opening.
    pub next_gap_bottom_y: f64,
    /// Horizontal distance from the agent to the next obstacle's leading edge.
    pub next_obstacle_distance: f64,
}

impl EnvState {
    /// Vertical center of the next obstacle's opening.
    #[must_use]
    pub fn gap_center_y(&self) -> f64 {
        f64::midpoint(self.next_gap_top_y, self.next_gap_bottom_y)
    }
}

/// The environment reported a state it cannot recover from.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("environment fault: {message}")]
pub struct EnvironmentFault {
    message: String,
}

impl EnvironmentFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A steppable, resettable episode environment.
///
/// An environment is mutated in place by [`act`](Self::act). It is never shared between
/// concurrently running episodes; parallel evaluators own one instance per worker.
///
/// # Reset contract
///
/// After [`init`](Self::init) or [`reset_with_scenario`](Self::reset_with_scenario) the
/// environment must carry no residual state from previous episodes: obstacle positions,
/// pass counters, agent velocity and internal randomness all start over.
pub trait Environment {
    /// Establishes a fresh episode with the current scenario.
    fn init(&mut self);

    /// Reconfigures the environment for a new scenario and starts a fresh episode.
    fn reset_with_scenario(&mut self, gaps: &[u32], target_count: usize);

    /// Queries the current state.
    fn state(&self) -> Result<EnvState, EnvironmentFault>;

    /// Advances one step, returning the reward earned in that step.
    ///
    /// The reward is the number of obstacles passed during the step; a fractional positive
    /// reward counts as one more pass.
    fn act(&mut self, action: Option<Action>) -> f64;

    /// Returns `true` once the episode has ended by collision or leaving the field.
    fn is_terminal(&self) -> bool;

    /// Height of the field, used to normalize vertical distances.
    fn height(&self) -> f64;
}
