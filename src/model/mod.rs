//! # Report Model
//!
//! The input representation for the layout engine: an ordered list of
//! sections, each holding an ordered list of typed blocks, plus page and
//! metric configuration. Whatever produced the content (API fetchers,
//! narrative templates, hand-written JSON) is invisible here; text fields
//! arrive as finished strings.
//!
//! Every field has a serde default. A block with a missing field still
//! deserializes, and the layout engine substitutes a safe value and records
//! a diagnostic instead of refusing the whole report.

use crate::style::Color;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A complete report ready for layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    #[serde(default)]
    pub metadata: Metadata,

    /// Page size and margins shared by every page.
    #[serde(default)]
    pub page: PageConfig,

    /// Text sizes and spacing used by the engine.
    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl ReportInput {
    /// Keep only the sections that belong to `edition`. Sections without an
    /// `editions` list belong to every edition.
    pub fn select_edition(&self, edition: &str) -> ReportInput {
        let sections = self
            .sections
            .iter()
            .filter(|s| s.editions.is_empty() || s.editions.iter().any(|e| e == edition))
            .cloned()
            .collect();
        ReportInput {
            metadata: self.metadata.clone(),
            page: self.page.clone(),
            layout: self.layout.clone(),
            sections,
        }
    }
}

/// Document-level metadata. Used for the title block, the footer line and
/// the PDF Info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub title: Option<String>,
    /// When the report content was generated. Supplied by the caller; the
    /// engine never reads the clock.
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    /// Left-aligned label in every page footer (e.g. the data source).
    #[serde(default)]
    pub footer_label: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// A titled group of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Major sections always start on a fresh page. Minor sections flow on
    /// directly after the previous content.
    #[serde(default = "default_true")]
    pub major: bool,

    /// Editions this section appears in. Empty means all editions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub editions: Vec<String>,
}

impl Section {
    pub fn new(title: &str, blocks: Vec<Block>) -> Self {
        Self {
            title: title.to_string(),
            blocks,
            major: true,
            editions: Vec::new(),
        }
    }

    /// A section that continues on the current page.
    pub fn minor(title: &str, blocks: Vec<Block>) -> Self {
        Self {
            major: false,
            ..Self::new(title, blocks)
        }
    }
}

fn default_true() -> bool {
    true
}

/// The unit of placement.
///
/// `Heading` and `Paragraph` may be split between lines across pages; every
/// other variant is atomic and lands on exactly one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    Heading {
        #[serde(default)]
        text: String,
        #[serde(default = "default_level")]
        level: u8,
    },

    Paragraph {
        #[serde(default)]
        text: String,
    },

    /// A labeled headline number, optionally with a trend marker.
    #[serde(rename_all = "camelCase")]
    StatCard {
        #[serde(default)]
        label: String,
        #[serde(default)]
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trend: Option<Trend>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accent_color: Option<Color>,
    },

    /// A horizontal score bar.
    #[serde(rename_all = "camelCase")]
    ProgressBar {
        #[serde(default)]
        label: String,
        #[serde(default)]
        score: f64,
        #[serde(default)]
        max: f64,
        /// Bar color. Derived from `score / max` when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color_band: Option<ColorBand>,
    },

    /// A wrapping row of tag chips.
    TagRow {
        #[serde(default)]
        tags: Vec<String>,
    },

    /// A key/value line, e.g. "License: MIT".
    MetadataRow {
        #[serde(default)]
        key: String,
        #[serde(default)]
        value: String,
    },

    Divider,
}

fn default_level() -> u8 {
    1
}

impl Block {
    pub fn heading(text: &str, level: u8) -> Self {
        Block::Heading {
            text: text.to_string(),
            level,
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Block::Paragraph {
            text: text.to_string(),
        }
    }

    pub fn stat_card(label: &str, value: &str) -> Self {
        Block::StatCard {
            label: label.to_string(),
            value: value.to_string(),
            trend: None,
            accent_color: None,
        }
    }

    pub fn progress_bar(label: &str, score: f64, max: f64) -> Self {
        Block::ProgressBar {
            label: label.to_string(),
            score,
            max,
            color_band: None,
        }
    }

    pub fn tag_row<S: AsRef<str>>(tags: &[S]) -> Self {
        Block::TagRow {
            tags: tags.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    pub fn metadata_row(key: &str, value: &str) -> Self {
        Block::MetadataRow {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Atomic blocks are never split across a page boundary.
    pub fn is_atomic(&self) -> bool {
        !matches!(self, Block::Heading { .. } | Block::Paragraph { .. })
    }

    /// Variant name, for diagnostics and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "Heading",
            Block::Paragraph { .. } => "Paragraph",
            Block::StatCard { .. } => "StatCard",
            Block::ProgressBar { .. } => "ProgressBar",
            Block::TagRow { .. } => "TagRow",
            Block::MetadataRow { .. } => "MetadataRow",
            Block::Divider => "Divider",
        }
    }
}

/// Direction and caption of a stat card trend marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    #[serde(default)]
    pub direction: TrendDirection,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
    #[default]
    Flat,
}

/// Color band of a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorBand {
    Low,
    Medium,
    High,
}

impl ColorBand {
    /// Band for a ratio in `0.0..=1.0`.
    pub fn for_ratio(ratio: f64) -> Self {
        if ratio >= 0.7 {
            ColorBand::High
        } else if ratio >= 0.4 {
            ColorBand::Medium
        } else {
            ColorBand::Low
        }
    }
}

/// Configuration for every page: size and margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default)]
    pub size: PageSize,

    /// Page margins in points (1/72 inch). Defaults to 20mm on every side.
    #[serde(default = "default_margin")]
    pub margin: Edges,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: default_margin(),
        }
    }
}

fn default_margin() -> Edges {
    Edges::uniform(mm(20.0))
}

/// Millimetres to points.
pub fn mm(v: f64) -> f64 {
    v * 72.0 / 25.4
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for margins.
///
/// Deserializes from either a single number (uniform inset) or an object
/// with the four sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "EdgesRepr")]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EdgesRepr {
    Uniform(f64),
    Sides {
        #[serde(default)]
        top: f64,
        #[serde(default)]
        right: f64,
        #[serde(default)]
        bottom: f64,
        #[serde(default)]
        left: f64,
    },
}

impl From<EdgesRepr> for Edges {
    fn from(repr: EdgesRepr) -> Self {
        match repr {
            EdgesRepr::Uniform(v) => Edges::uniform(v),
            EdgesRepr::Sides {
                top,
                right,
                bottom,
                left,
            } => Edges {
                top,
                right,
                bottom,
                left,
            },
        }
    }
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Text sizes and spacing. These are metrics, not a theme: colors and
/// shapes are fixed by the block painters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Paragraph font size in points.
    pub body_font_size: f64,
    /// Line height as a multiplier of font size.
    pub line_height: f64,
    /// Vertical space after every block.
    pub block_gap: f64,
    /// Height reserved at the bottom of the content area for the footer.
    pub footer_height: f64,
    pub footer_font_size: f64,
}

impl LayoutConfig {
    pub const MIN_FOOTER_HEIGHT: f64 = 18.0;
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            body_font_size: 10.0,
            line_height: 1.4,
            block_gap: 8.0,
            footer_height: 24.0,
            footer_font_size: 8.0,
        }
    }
}
