//! Named colour palette shared by overlays and factories.

use crate::error::{Result, TouchMcuError};

/// RGBA colour with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Palette ids accepted in overlays, in display order
pub const PALETTE: [(&str, Color); 11] = [
    ("red", Color::rgb(0.94, 0.26, 0.21)),
    ("orange", Color::rgb(1.0, 0.6, 0.0)),
    ("yellow", Color::rgb(1.0, 0.92, 0.23)),
    ("green", Color::rgb(0.3, 0.69, 0.31)),
    ("cyan", Color::rgb(0.0, 0.74, 0.83)),
    ("blue", Color::rgb(0.13, 0.59, 0.95)),
    ("purple", Color::rgb(0.61, 0.15, 0.69)),
    ("magenta", Color::rgb(0.91, 0.12, 0.39)),
    ("white", Color::rgb(1.0, 1.0, 1.0)),
    ("gray", Color::rgb(0.5, 0.5, 0.5)),
    ("black", Color::rgb(0.0, 0.0, 0.0)),
];

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Look up a palette id (case-insensitive).
    pub fn from_id(id: &str) -> Result<Self> {
        PALETTE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(id))
            .map(|(_, color)| *color)
            .ok_or_else(|| TouchMcuError::UnknownColor { id: id.to_string() })
    }

    /// Same hue with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Background used for group panels.
pub const PANEL: Color = Color::rgba(0.15, 0.15, 0.15, 1.0);
/// Foreground used for LCD text.
pub const LCD_TEXT: Color = Color::rgb(0.55, 0.85, 1.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(Color::from_id("red").unwrap(), PALETTE[0].1);
        assert_eq!(Color::from_id("Blue").unwrap(), Color::rgb(0.13, 0.59, 0.95));
    }

    #[test]
    fn test_unknown_color() {
        let err = Color::from_id("chartreuse").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_COLOR");
    }

    #[test]
    fn test_with_alpha() {
        let c = Color::rgb(1.0, 0.0, 0.0).with_alpha(0.25);
        assert_eq!(c.a, 0.25);
        assert_eq!(c.r, 1.0);
    }
}
