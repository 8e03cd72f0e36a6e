//! # Font Management
//!
//! Reports are set in the standard PDF Type1 fonts, which every viewer ships
//! and which need no embedding. Layout measures text with the same AFM
//! advance widths the viewer will use, so a line that measures as fitting
//! really does fit on paper.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use serde::Serialize;

/// The standard PDF fonts the engine sets text in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// AFM metrics for this font.
    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica => &metrics::HELVETICA,
            Self::HelveticaBold => &metrics::HELVETICA_BOLD,
        }
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.metrics().char_width(ch, font_size)
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        self.metrics().measure_string(text, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_space() {
        let w = StandardFont::Helvetica.char_width(' ', 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_bold_wider() {
        let regular = StandardFont::Helvetica.measure_string("Quarterly", 12.0);
        let bold = StandardFont::HelveticaBold.measure_string("Quarterly", 12.0);
        assert!(bold > regular, "Bold text should be wider than regular");
    }

    #[test]
    fn test_unknown_char_uses_default_advance() {
        let w = StandardFont::Helvetica.char_width('\u{4E2D}', 10.0);
        assert!((w - 5.56).abs() < 0.001);
    }

    #[test]
    fn test_pdf_names() {
        assert_eq!(StandardFont::Helvetica.pdf_name(), "Helvetica");
        assert_eq!(StandardFont::HelveticaBold.pdf_name(), "Helvetica-Bold");
    }
}
