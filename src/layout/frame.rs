//! Rectangles used to position controls.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TouchMcuError};

/// Absolute rectangle of a control, in canvas pixels.
///
/// Factories build subtrees relative to their own origin; the composition
/// layer translates the returned subtree root with [`Rect::move_by`].
///
/// Fields are private so every rectangle passes through [`Rect::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRect")]
pub struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Deserialize)]
struct RawRect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl TryFrom<RawRect> for Rect {
    type Error = TouchMcuError;

    fn try_from(raw: RawRect) -> Result<Self> {
        Rect::new(raw.x, raw.y, raw.w, raw.h)
    }
}

impl Rect {
    /// Create a rectangle, rejecting negative or non-finite dimensions.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Result<Self> {
        let rect = Self { x, y, w, h };
        rect.validate()?;
        Ok(rect)
    }

    /// Check the size is non-negative and every coordinate finite.
    pub fn validate(&self) -> Result<()> {
        let Self { x, y, w, h } = *self;
        let finite = x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite();
        if !(finite && w >= 0.0 && h >= 0.0) {
            return Err(TouchMcuError::InvalidFrame { w, h });
        }
        Ok(())
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn w(&self) -> f32 {
        self.w
    }

    pub fn h(&self) -> f32 {
        self.h
    }

    /// Rectangle at the origin with the given size.
    pub fn sized(w: f32, h: f32) -> Result<Self> {
        Self::new(0.0, 0.0, w, h)
    }

    /// Translate in place. Size is untouched.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Copy translated by the given offset.
    pub fn translated(mut self, dx: f32, dy: f32) -> Self {
        self.move_by(dx, dy);
        self
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}
