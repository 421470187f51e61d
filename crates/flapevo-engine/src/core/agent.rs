use crate::Rect;

/// Physical constants governing the agent's vertical motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPhysics {
    /// Velocity added every step.
    pub gravity: f64,
    /// Terminal downward velocity.
    pub max_fall_speed: f64,
    /// Velocity set by a flap (negative is upwards).
    pub flap_velocity: f64,
}

/// The controlled body.
///
/// The agent never moves horizontally; obstacles scroll past it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    velocity: f64,
}

impl Agent {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            velocity: 0.0,
        }
    }

    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Advances the agent by one step.
    ///
    /// A flap replaces the current velocity; otherwise gravity accelerates the agent
    /// up to `max_fall_speed`.
    pub fn step(&mut self, flap: bool, physics: &AgentPhysics) {
        if flap {
            self.velocity = physics.flap_velocity;
        } else {
            self.velocity = (self.velocity + physics.gravity).min(physics.max_fall_speed);
        }
        self.y += self.velocity;
    }
}
