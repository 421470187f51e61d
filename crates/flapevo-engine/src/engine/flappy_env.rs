use arrayvec::ArrayVec;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    Action, Agent, AgentPhysics, EnvSeed, EnvState, Environment, EnvironmentFault, FramePacing,
    Obstacle, Rect,
};

/// Upper bound on simultaneously tracked obstacles.
///
/// With the default geometry at most four obstacles are alive at once.
const MAX_OBSTACLES: usize = 8;

/// Gap value used when no scenario has been loaded: a centered opening.
const DEFAULT_GAP: u32 = 125;

/// Field geometry and physics of [`FlappyEnv`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyConfig {
    pub width: f64,
    pub height: f64,
    /// Top edge of the ground; touching it ends the episode.
    pub floor_y: f64,
    pub agent_x: f64,
    pub agent_width: f64,
    pub agent_height: f64,
    pub gravity: f64,
    pub max_fall_speed: f64,
    pub flap_velocity: f64,
    /// Horizontal obstacle movement per step.
    pub scroll_speed: f64,
    pub obstacle_width: f64,
    /// Horizontal distance between consecutive obstacles' leading edges.
    pub obstacle_spacing: f64,
    /// Vertical size of every opening.
    pub gap_height: f64,
    /// Minimum solid margin above and below the opening.
    pub gap_margin: f64,
    /// Maximum deviation of the agent's start height from the field center.
    pub start_jitter: f64,
}

impl Default for FlappyConfig {
    fn default() -> Self {
        Self {
            width: 288.0,
            height: 512.0,
            floor_y: 400.0,
            agent_x: 57.0,
            agent_width: 34.0,
            agent_height: 24.0,
            gravity: 1.0,
            max_fall_speed: 10.0,
            flap_velocity: -9.0,
            scroll_speed: 4.0,
            obstacle_width: 52.0,
            obstacle_spacing: 160.0,
            gap_height: 100.0,
            gap_margin: 25.0,
            start_jitter: 8.0,
        }
    }
}

impl FlappyConfig {
    const fn physics(&self) -> AgentPhysics {
        AgentPhysics {
            gravity: self.gravity,
            max_fall_speed: self.max_fall_speed,
            flap_velocity: self.flap_velocity,
        }
    }

    /// Maps a scenario gap value to the top edge of the opening.
    ///
    /// Values beyond the playable band are clamped so that the opening keeps
    /// `gap_margin` of solid column on both sides.
    #[must_use]
    pub fn gap_top_y(&self, gap: u32) -> f64 {
        let max_offset = (self.floor_y - 2.0 * self.gap_margin - self.gap_height).max(0.0);
        self.gap_margin + f64::from(gap).min(max_offset)
    }
}

/// Deterministic side-scrolling obstacle environment.
///
/// The agent sits at a fixed horizontal position while obstacles scroll towards it.
/// Each new obstacle takes the next value of the loaded gap sequence, cycling when the
/// sequence is exhausted. Passing an obstacle earns a reward of `1.0`.
///
/// The environment is reseeded from its [`EnvSeed`] on every reset, so every episode
/// with the same scenario starts from the same state.
#[derive(Debug, Clone)]
pub struct FlappyEnv {
    config: FlappyConfig,
    seed: EnvSeed,
    pacing: FramePacing,
    gaps: Vec<u32>,
    target_count: usize,
    next_gap_index: usize,
    obstacles: ArrayVec<Obstacle, MAX_OBSTACLES>,
    agent: Agent,
    steps: u64,
    passed: usize,
    terminal: bool,
}

impl Default for FlappyEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl FlappyEnv {
    /// Creates an environment with default geometry and a zero seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FlappyConfig::default(), EnvSeed::from(0))
    }

    #[must_use]
    pub fn with_seed(seed: EnvSeed) -> Self {
        Self::with_config(FlappyConfig::default(), seed)
    }

    #[must_use]
    pub fn with_config(config: FlappyConfig, seed: EnvSeed) -> Self {
        let mut this = Self {
            config,
            seed,
            pacing: FramePacing::Fast,
            gaps: vec![DEFAULT_GAP],
            target_count: 0,
            next_gap_index: 0,
            obstacles: ArrayVec::new(),
            agent: Agent::new(config.agent_x, 0.0, config.agent_width, config.agent_height),
            steps: 0,
            passed: 0,
            terminal: false,
        };
        this.init();
        this
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: FramePacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn set_pacing(&mut self, pacing: FramePacing) {
        self.pacing = pacing;
    }

    #[must_use]
    pub fn config(&self) -> &FlappyConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> EnvSeed {
        self.seed
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Number of steps taken in the current episode.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of obstacles passed in the current episode.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.passed
    }

    #[must_use]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.obstacles.iter()
    }

    fn next_gap(&mut self) -> u32 {
        let gap = self.gaps[self.next_gap_index % self.gaps.len()];
        self.next_gap_index += 1;
        gap
    }

    fn spawn_obstacles(&mut self) {
        let spawn_limit = self.config.width + self.config.obstacle_spacing;
        loop {
            let x = self
                .obstacles
                .last()
                .map_or(self.config.width, |o| o.x() + self.config.obstacle_spacing);
            if x > spawn_limit || self.obstacles.is_full() {
                break;
            }
            let gap = self.next_gap();
            let gap_top_y = self.config.gap_top_y(gap);
            self.obstacles.push(Obstacle::new(
                x,
                self.config.obstacle_width,
                gap_top_y,
                self.config.gap_height,
            ));
        }
    }

    fn next_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .find(|o| o.right() >= self.config.agent_x)
    }

    fn is_out_of_bounds(&self, body: &Rect) -> bool {
        body.y < 0.0 || body.bottom() > self.config.floor_y
    }
}

impl Environment for FlappyEnv {
    fn init(&mut self) {
        let mut rng = Pcg32::seed_from_u64(self.seed.value());
        let jitter = self.config.start_jitter;
        let offset = if jitter > 0.0 {
            rng.random_range(-jitter..=jitter)
        } else {
            0.0
        };
        let start_y = (self.config.floor_y - self.config.agent_height) / 2.0 + offset;

        self.agent = Agent::new(
            self.config.agent_x,
            start_y,
            self.config.agent_width,
            self.config.agent_height,
        );
        self.obstacles.clear();
        self.next_gap_index = 0;
        self.steps = 0;
        self.passed = 0;
        self.terminal = false;
        self.spawn_obstacles();
    }

    fn reset_with_scenario(&mut self, gaps: &[u32], target_count: usize) {
        self.gaps.clear();
        self.gaps.extend_from_slice(gaps);
        if self.gaps.is_empty() {
            self.gaps.push(DEFAULT_GAP);
        }
        self.target_count = target_count;
        self.init();
    }

    fn state(&self) -> Result<EnvState, EnvironmentFault> {
        let obstacle = self
            .next_obstacle()
            .ok_or_else(|| EnvironmentFault::new("no obstacle ahead of the agent"))?;
        let state = EnvState {
            player_y: self.agent.y(),
            player_velocity: self.agent.velocity(),
            next_gap_top_y: obstacle.gap_top_y(),
            next_gap_bottom_y: obstacle.gap_bottom_y(),
            next_obstacle_distance: obstacle.x() - self.agent.bounds().right(),
        };
        if !(state.player_y.is_finite() && state.player_velocity.is_finite()) {
            return Err(EnvironmentFault::new(format!(
                "non-finite agent state: y={}, velocity={}",
                state.player_y, state.player_velocity
            )));
        }
        Ok(state)
    }

    fn act(&mut self, action: Option<Action>) -> f64 {
        if self.terminal {
            return 0.0;
        }
        self.pacing.wait();

        let flap = action.is_some_and(|a| a.is_flap());
        self.agent.step(flap, &self.config.physics());

        let scroll = self.config.scroll_speed;
        for obstacle in &mut self.obstacles {
            obstacle.scroll(scroll);
        }
        self.obstacles.retain(|o| o.right() >= 0.0);
        self.spawn_obstacles();

        let mut reward = 0.0;
        for obstacle in &mut self.obstacles {
            if !obstacle.is_passed() && obstacle.right() < self.config.agent_x {
                obstacle.mark_passed();
                self.passed += 1;
                reward += 1.0;
            }
        }

        let body = self.agent.bounds();
        self.terminal = self.is_out_of_bounds(&body)
            || self.obstacles.iter().any(|o| o.collides_with(&body));
        self.steps += 1;
        reward
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn height(&self) -> f64 {
        self.config.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flaps whenever the agent sinks close to the lower edge of the opening.
    fn hover_in_gap(env: &mut FlappyEnv) -> f64 {
        let state = env.state().unwrap();
        let bottom = state.player_y + env.config().agent_height;
        let action = (bottom > state.next_gap_bottom_y - 15.0).then_some(Action::Flap);
        env.act(action)
    }

    #[test]
    fn test_falls_to_floor_without_action() {
        let mut env = FlappyEnv::new();
        env.reset_with_scenario(&[100], 1);
        let mut steps = 0;
        while !env.is_terminal() {
            env.act(None);
            steps += 1;
            assert!(steps < 1000, "episode never terminated");
        }
        assert_eq!(env.passed_count(), 0);
        assert!(env.agent().bounds().bottom() > env.config().floor_y);
    }

    #[test]
    fn test_flapping_forever_hits_ceiling() {
        let mut env = FlappyEnv::new();
        while !env.is_terminal() {
            env.act(Some(Action::Flap));
        }
        assert!(env.agent().y() < 0.0);
    }

    #[test]
    fn test_centered_controller_passes_obstacles() {
        let mut env = FlappyEnv::new();
        env.reset_with_scenario(&[125, 100, 150, 125], 4);
        let mut passed = 0;
        for _ in 0..2000 {
            if env.is_terminal() {
                break;
            }
            if hover_in_gap(&mut env) > 0.0 {
                passed += 1;
            }
        }
        assert!(passed >= 4, "passed only {passed} obstacles");
        assert_eq!(env.passed_count(), passed);
    }

    #[test]
    fn test_reset_leaves_no_residual_state() {
        let mut env = FlappyEnv::with_seed(EnvSeed::from(7));
        env.reset_with_scenario(&[10, 150, 60], 3);
        let initial = env.state().unwrap();
        for _ in 0..30 {
            hover_in_gap(&mut env);
        }
        assert_ne!(env.steps(), 0);

        env.reset_with_scenario(&[10, 150, 60], 3);
        assert_eq!(env.steps(), 0);
        assert_eq!(env.passed_count(), 0);
        assert!(!env.is_terminal());
        assert_eq!(env.state().unwrap(), initial);
    }

    #[test]
    fn test_same_seed_same_start_state() {
        let a = FlappyEnv::with_seed(EnvSeed::from(42));
        let b = FlappyEnv::with_seed(EnvSeed::from(42));
        assert_eq!(a.state().unwrap(), b.state().unwrap());
    }

    #[test]
    fn test_gap_values_are_clamped_to_playable_band() {
        let config = FlappyConfig::default();
        assert_eq!(config.gap_top_y(0), 25.0);
        assert_eq!(config.gap_top_y(100), 125.0);
        assert_eq!(config.gap_top_y(10_000), 275.0);
    }

    #[test]
    fn test_gap_sequence_cycles() {
        let mut env = FlappyEnv::new();
        env.reset_with_scenario(&[0, 200], 1);
        let tops = env.obstacles().map(Obstacle::gap_top_y).collect::<Vec<_>>();
        assert_eq!(tops, vec![25.0, 225.0]);
    }

    #[test]
    fn test_act_after_terminal_is_noop() {
        let mut env = FlappyEnv::new();
        while !env.is_terminal() {
            env.act(None);
        }
        let steps = env.steps();
        assert_eq!(env.act(Some(Action::Flap)), 0.0);
        assert_eq!(env.steps(), steps);
    }
}
