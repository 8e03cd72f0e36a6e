//! # Style Tokens
//!
//! Explicit drawing state for primitives. Every primitive carries its own
//! [`Style`] or [`TextStyle`] value; there is no ambient "current fill" that
//! a previous draw could leave behind.
//!
//! Colors deserialize either from the `{ "r", "g", "b", "a" }` object form
//! or from a `"#rrggbb"` / `"#rgb"` hex string.

use crate::font::StandardFont;
use serde::{Deserialize, Serialize};

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColorRepr")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Accepted input forms for a [`Color`].
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Rgba {
        r: f64,
        g: f64,
        b: f64,
        #[serde(default = "opaque")]
        a: f64,
    },
}

fn opaque() -> f64 {
    1.0
}

impl From<ColorRepr> for Color {
    fn from(repr: ColorRepr) -> Self {
        match repr {
            ColorRepr::Hex(s) => Color::hex(&s),
            ColorRepr::Rgba { r, g, b, a } => Color {
                r: r.clamp(0.0, 1.0),
                g: g.clamp(0.0, 1.0),
                b: b.clamp(0.0, 1.0),
                a: a.clamp(0.0, 1.0),
            },
        }
    }
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rgb` or `#rrggbb`. Anything else yields black.
    pub fn hex(hex: &str) -> Self {
        let digits: Vec<u8> = hex
            .trim()
            .trim_start_matches('#')
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .unwrap_or_default();
        let channel = |hi: u8, lo: u8| f64::from(hi * 16 + lo) / 255.0;
        match digits[..] {
            [r, g, b] => Self::rgb(channel(r, r), channel(g, g), channel(b, b)),
            [r1, r0, g1, g0, b1, b0] => {
                Self::rgb(channel(r1, r0), channel(g1, g0), channel(b1, b0))
            }
            _ => Color::BLACK,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

// ── Palette ────────────────────────────────────────────────────

pub mod palette {
    use super::Color;

    pub const TEXT: Color = Color::rgb(0.11, 0.12, 0.15);
    pub const MUTED: Color = Color::rgb(0.42, 0.45, 0.50);
    pub const ACCENT: Color = Color::rgb(0.15, 0.39, 0.92);
    pub const CARD_FILL: Color = Color::rgb(0.97, 0.98, 0.99);
    pub const CARD_STROKE: Color = Color::rgb(0.88, 0.90, 0.93);
    pub const TRACK: Color = Color::rgb(0.90, 0.91, 0.93);
    pub const CHIP_FILL: Color = Color::rgb(0.91, 0.94, 0.99);
    pub const CHIP_TEXT: Color = Color::rgb(0.12, 0.25, 0.60);
    pub const RULE: Color = Color::rgb(0.82, 0.84, 0.87);
    pub const BAND_LOW: Color = Color::rgb(0.86, 0.21, 0.21);
    pub const BAND_MEDIUM: Color = Color::rgb(0.96, 0.62, 0.04);
    pub const BAND_HIGH: Color = Color::rgb(0.09, 0.64, 0.29);
    pub const TREND_UP: Color = BAND_HIGH;
    pub const TREND_DOWN: Color = BAND_LOW;
    pub const TREND_FLAT: Color = MUTED;
}

/// Fill/stroke state for a shape primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub corner_radius: f64,
}

impl Style {
    /// A filled shape with no outline.
    pub fn filled(fill: Color) -> Self {
        Self {
            fill: Some(fill),
            stroke: None,
            stroke_width: 0.0,
            corner_radius: 0.0,
        }
    }

    /// An outlined shape with no fill.
    pub fn stroked(stroke: Color, width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
            stroke_width: width,
            corner_radius: 0.0,
        }
    }

    pub fn with_stroke(mut self, stroke: Color, width: f64) -> Self {
        self.stroke = Some(stroke);
        self.stroke_width = width;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    /// Half the stroke width sticks out past the geometric edge.
    pub fn outset(&self) -> f64 {
        if self.stroke.is_some() {
            self.stroke_width / 2.0
        } else {
            0.0
        }
    }
}

/// Font, size, leading and color for a text run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font: StandardFont,
    pub size: f64,
    /// Line height as a multiplier of `size`.
    pub line_height: f64,
    pub color: Color,
}

impl TextStyle {
    pub fn new(font: StandardFont, size: f64, line_height: f64, color: Color) -> Self {
        Self {
            font,
            size,
            line_height,
            color,
        }
    }

    /// Height of one line box in points.
    pub fn line_box(&self) -> f64 {
        self.size * self.line_height
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}
