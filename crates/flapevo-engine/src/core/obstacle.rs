use crate::Rect;

/// A scrolling obstacle: a full-height column with one opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    x: f64,
    width: f64,
    gap_top_y: f64,
    gap_bottom_y: f64,
    passed: bool,
}

impl Obstacle {
    #[must_use]
    pub const fn new(x: f64, width: f64, gap_top_y: f64, gap_height: f64) -> Self {
        Self {
            x,
            width,
            gap_top_y,
            gap_bottom_y: gap_top_y + gap_height,
            passed: false,
        }
    }

    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub const fn gap_top_y(&self) -> f64 {
        self.gap_top_y
    }

    #[must_use]
    pub const fn gap_bottom_y(&self) -> f64 {
        self.gap_bottom_y
    }

    #[must_use]
    pub const fn is_passed(&self) -> bool {
        self.passed
    }

    pub const fn mark_passed(&mut self) {
        self.passed = true;
    }

    pub fn scroll(&mut self, dx: f64) {
        self.x -= dx;
    }

    /// Returns `true` if `body` touches the solid part of this obstacle.
    #[must_use]
    pub fn collides_with(&self, body: &Rect) -> bool {
        let overlaps_column = body.x < self.right() && self.x < body.right();
        overlaps_column && (body.y < self.gap_top_y || body.bottom() > self.gap_bottom_y)
    }
}
