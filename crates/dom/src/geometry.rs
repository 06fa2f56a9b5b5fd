//! Layout geometry in CSS pixels.

/// Border box of a laid-out element, relative to the viewport origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Copy of this rect moved down by `delta`.
    #[must_use]
    pub fn shifted_down(self, delta: f64) -> Self {
        Self {
            y: self.y + delta,
            ..self
        }
    }
}
