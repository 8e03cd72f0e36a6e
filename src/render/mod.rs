//! # Primitive Renderer
//!
//! The closed vocabulary of drawing primitives that positioned blocks are
//! lowered into. Every primitive carries its own explicit style, and every
//! primitive knows its bounding box so the composer can check it against
//! the content area and clip oversized blocks.
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! page and y growing downward. The PDF serializer flips them.

pub mod paint;

use serde::Serialize;

use crate::style::{Color, Style, TextStyle};

/// An axis-aligned box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when `self` lies inside `outer`, allowing `tolerance` of slack
    /// on every edge.
    pub fn within(&self, outer: &Bounds, tolerance: f64) -> bool {
        self.x >= outer.x - tolerance
            && self.y >= outer.y - tolerance
            && self.right() <= outer.right() + tolerance
            && self.bottom() <= outer.bottom() + tolerance
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// A drawing instruction. Text runs are single lines; wrapping happened
/// during measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Primitive {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: Style,
    },
    /// A rectangle whose corner radius comes from `style.corner_radius`.
    RoundedRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: Style,
    },
    /// A fully rounded track with the leading `fraction` of it filled.
    FilledBar {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fraction: f64,
        track: Color,
        fill: Color,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        style: Style,
    },
    /// One line of text. `y` is the top of the line box; `width` is the
    /// measured advance of `text`.
    TextRun {
        x: f64,
        y: f64,
        width: f64,
        text: String,
        style: TextStyle,
    },
    /// A pill with centered text.
    #[serde(rename_all = "camelCase")]
    Chip {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        text: String,
        fill: Color,
        text_style: TextStyle,
    },
}

impl Primitive {
    pub fn bounds(&self) -> Bounds {
        match self {
            Primitive::Rect {
                x,
                y,
                width,
                height,
                style,
            }
            | Primitive::RoundedRect {
                x,
                y,
                width,
                height,
                style,
            } => {
                let o = style.outset();
                Bounds::new(x - o, y - o, width + 2.0 * o, height + 2.0 * o)
            }
            Primitive::FilledBar {
                x,
                y,
                width,
                height,
                ..
            }
            | Primitive::Chip {
                x,
                y,
                width,
                height,
                ..
            } => Bounds::new(*x, *y, *width, *height),
            Primitive::Circle {
                cx,
                cy,
                radius,
                style,
            } => {
                let r = radius + style.outset();
                Bounds::new(cx - r, cy - r, 2.0 * r, 2.0 * r)
            }
            Primitive::TextRun {
                x, y, width, style, ..
            } => Bounds::new(*x, *y, *width, style.line_box()),
        }
    }

    /// Clip against a horizontal line at `limit`.
    ///
    /// Primitives entirely above the line are returned unchanged. Boxes and
    /// bars that cross it are shortened. Text, chips and circles that cross
    /// it are dropped whole, as is anything starting at or below it.
    pub fn clip_bottom(&self, limit: f64) -> Option<Primitive> {
        const SLACK: f64 = 1e-6;
        let bounds = self.bounds();
        if bounds.bottom() <= limit + SLACK {
            return Some(self.clone());
        }
        if bounds.y >= limit {
            return None;
        }

        match self {
            Primitive::Rect {
                x,
                y,
                width,
                style,
                ..
            } => Some(Primitive::Rect {
                x: *x,
                y: *y,
                width: *width,
                height: (limit - y - style.outset()).max(0.0),
                style: *style,
            }),
            Primitive::RoundedRect {
                x,
                y,
                width,
                style,
                ..
            } => Some(Primitive::RoundedRect {
                x: *x,
                y: *y,
                width: *width,
                height: (limit - y - style.outset()).max(0.0),
                style: *style,
            }),
            Primitive::FilledBar {
                x,
                y,
                width,
                fraction,
                track,
                fill,
                ..
            } => Some(Primitive::FilledBar {
                x: *x,
                y: *y,
                width: *width,
                height: limit - y,
                fraction: *fraction,
                track: *track,
                fill: *fill,
            }),
            Primitive::Circle { .. } | Primitive::TextRun { .. } | Primitive::Chip { .. } => None,
        }
    }

    /// The text carried by this primitive, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Primitive::TextRun { text, .. } | Primitive::Chip { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFont;
    use crate::style::palette;

    fn run(y: f64) -> Primitive {
        Primitive::TextRun {
            x: 10.0,
            y,
            width: 40.0,
            text: "hello".to_string(),
            style: TextStyle::new(StandardFont::Helvetica, 10.0, 1.4, palette::TEXT),
        }
    }

    #[test]
    fn stroked_rect_bounds_include_half_the_stroke() {
        let rect = Primitive::Rect {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 50.0,
            style: Style::stroked(Color::BLACK, 2.0),
        };
        assert_eq!(rect.bounds(), Bounds::new(9.0, 9.0, 102.0, 52.0));
    }

    #[test]
    fn text_bounds_use_line_box() {
        let b = run(20.0).bounds();
        assert!((b.height - 14.0).abs() < 1e-9);
        assert_eq!(b.width, 40.0);
    }

    #[test]
    fn circle_bounds() {
        let c = Primitive::Circle {
            cx: 50.0,
            cy: 50.0,
            radius: 5.0,
            style: Style::filled(Color::BLACK),
        };
        assert_eq!(c.bounds(), Bounds::new(45.0, 45.0, 10.0, 10.0));
    }

    #[test]
    fn clip_keeps_primitives_above_limit() {
        assert_eq!(run(10.0).clip_bottom(100.0), Some(run(10.0)));
    }

    #[test]
    fn clip_drops_text_crossing_limit() {
        assert_eq!(run(95.0).clip_bottom(100.0), None);
        assert_eq!(run(120.0).clip_bottom(100.0), None);
    }

    #[test]
    fn clip_shortens_boxes() {
        let rect = Primitive::RoundedRect {
            x: 0.0,
            y: 50.0,
            width: 100.0,
            height: 200.0,
            style: Style::filled(palette::CARD_FILL).with_radius(4.0),
        };
        let clipped = rect.clip_bottom(120.0).unwrap();
        let b = clipped.bounds();
        assert!((b.bottom() - 120.0).abs() < 1e-9);
        assert_eq!(b.y, 50.0);
    }

    #[test]
    fn within_with_tolerance() {
        let outer = Bounds::new(0.0, 0.0, 100.0, 100.0);
        assert!(Bounds::new(0.0, 0.0, 100.0, 100.0).within(&outer, 0.0));
        assert!(Bounds::new(0.0, 0.0, 100.0005, 100.0).within(&outer, 1e-3));
        assert!(!Bounds::new(-1.0, 0.0, 10.0, 10.0).within(&outer, 1e-3));
    }
}
