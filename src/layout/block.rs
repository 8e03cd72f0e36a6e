//! # Block Measurement
//!
//! Height of every block variant at a given width, plus the repair step that
//! turns malformed block data into something safe to draw. Measurement is
//! pure: the same block, config and width always produce the same result.
//!
//! Heights of atomic blocks come from fixed constants plus measured text
//! lines, so the painters in `render::paint` can reproduce the exact same
//! geometry from the same constants.

use crate::font::StandardFont;
use crate::model::{Block, LayoutConfig};
use crate::style::{palette, TextStyle};
use crate::text::{self, WrappedText};

// ── Stat card ──────────────────────────────────────────────────
pub const STAT_CARD_PADDING: f64 = 8.0;
/// Height of the value row under the label.
pub const STAT_CARD_ROW_HEIGHT: f64 = 24.0;
pub const STAT_CARD_RADIUS: f64 = 4.0;
pub const STAT_CARD_STROKE: f64 = 0.75;
pub const STAT_ACCENT_WIDTH: f64 = 3.0;
pub const STAT_VALUE_SIZE: f64 = 16.0;
pub const TREND_SIZE: f64 = 8.0;
pub const TREND_MARKER_RADIUS: f64 = 3.0;

// ── Progress bar ───────────────────────────────────────────────
pub const BAR_HEIGHT: f64 = 8.0;
pub const BAR_LABEL_GAP: f64 = 4.0;

// ── Tag row ────────────────────────────────────────────────────
pub const CHIP_HEIGHT: f64 = 16.0;
/// Chip height plus the vertical gap to the next row.
pub const CHIP_ROW_HEIGHT: f64 = 22.0;
/// Horizontal gap after each chip.
pub const CHIP_GAP: f64 = 6.0;
pub const CHIP_PADDING_X: f64 = 7.0;
pub const CHIP_FONT_SIZE: f64 = 8.0;

// ── Metadata row ───────────────────────────────────────────────
pub const METADATA_PADDING: f64 = 3.0;
/// Share of the content width given to the key column.
pub const METADATA_KEY_FRACTION: f64 = 0.32;
pub const HAIRLINE: f64 = 0.5;

// ── Divider ────────────────────────────────────────────────────
pub const DIVIDER_HEIGHT: f64 = 12.0;
pub const DIVIDER_THICKNESS: f64 = 0.75;

// ── Text styles ────────────────────────────────────────────────

pub fn body_style(config: &LayoutConfig) -> TextStyle {
    TextStyle::new(
        StandardFont::Helvetica,
        config.body_font_size,
        config.line_height,
        palette::TEXT,
    )
}

/// Headings scale with the body size and use tighter leading.
pub fn heading_style(config: &LayoutConfig, level: u8) -> TextStyle {
    let factor = match level {
        0 | 1 => 1.6,
        2 => 1.3,
        _ => 1.1,
    };
    TextStyle::new(
        StandardFont::HelveticaBold,
        config.body_font_size * factor,
        1.25,
        palette::TEXT,
    )
}

/// The document title at the top of the first page.
pub fn title_style(config: &LayoutConfig) -> TextStyle {
    TextStyle::new(
        StandardFont::HelveticaBold,
        config.body_font_size * 2.2,
        1.2,
        palette::TEXT,
    )
}

pub fn stat_label_style(config: &LayoutConfig) -> TextStyle {
    TextStyle::new(
        StandardFont::Helvetica,
        config.body_font_size * 0.85,
        config.line_height,
        palette::MUTED,
    )
}

pub fn stat_value_style() -> TextStyle {
    TextStyle::new(StandardFont::HelveticaBold, STAT_VALUE_SIZE, 1.2, palette::TEXT)
}

pub fn trend_style() -> TextStyle {
    TextStyle::new(StandardFont::Helvetica, TREND_SIZE, 1.2, palette::MUTED)
}

pub fn chip_style() -> TextStyle {
    TextStyle::new(StandardFont::Helvetica, CHIP_FONT_SIZE, 1.2, palette::CHIP_TEXT)
}

pub fn metadata_key_style(config: &LayoutConfig) -> TextStyle {
    TextStyle::new(
        StandardFont::HelveticaBold,
        config.body_font_size,
        config.line_height,
        palette::MUTED,
    )
}

// ── Repair ─────────────────────────────────────────────────────

/// Replace malformed fields with safe defaults.
///
/// Returns the repaired block and one human-readable reason per repair. An
/// empty reason list means the block was already well formed.
pub fn normalize(block: &Block) -> (Block, Vec<String>) {
    let mut reasons = Vec::new();
    let repaired = match block {
        Block::Heading { text, level } => {
            if text.trim().is_empty() {
                reasons.push("heading has no text".to_string());
            }
            let clamped = (*level).clamp(1, 6);
            if clamped != *level {
                reasons.push(format!("heading level {level} out of range 1-6"));
            }
            Block::Heading {
                text: text.clone(),
                level: clamped,
            }
        }

        Block::Paragraph { text } => {
            if text.trim().is_empty() {
                reasons.push("paragraph has no text".to_string());
            }
            block.clone()
        }

        Block::StatCard {
            label,
            value,
            trend,
            accent_color,
        } => {
            if label.trim().is_empty() {
                reasons.push("stat card has no label".to_string());
            }
            let value = if value.trim().is_empty() {
                reasons.push("stat card has no value".to_string());
                "-".to_string()
            } else {
                value.clone()
            };
            Block::StatCard {
                label: label.clone(),
                value,
                trend: trend.clone(),
                accent_color: *accent_color,
            }
        }

        Block::ProgressBar {
            label,
            score,
            max,
            color_band,
        } => {
            if label.trim().is_empty() {
                reasons.push("progress bar has no label".to_string());
            }
            let max_valid = max.is_finite() && *max > 0.0;
            if !max_valid {
                reasons.push(format!("progress bar max must be positive, got {max}"));
            }
            let mut score = *score;
            if !score.is_finite() {
                reasons.push("progress bar score is not a number".to_string());
                score = 0.0;
            } else if score < 0.0 {
                reasons.push(format!("progress bar score {score} below zero"));
                score = 0.0;
            } else if max_valid && score > *max {
                reasons.push(format!("progress bar score {score} exceeds max {max}"));
                score = *max;
            }
            Block::ProgressBar {
                label: label.clone(),
                score,
                max: *max,
                color_band: *color_band,
            }
        }

        Block::TagRow { tags } => {
            let kept: Vec<String> = tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            if kept.is_empty() {
                reasons.push("tag row has no tags".to_string());
            } else if kept.len() < tags.len() {
                reasons.push(format!(
                    "tag row dropped {} empty tag(s)",
                    tags.len() - kept.len()
                ));
            }
            Block::TagRow { tags: kept }
        }

        Block::MetadataRow { key, value } => {
            if key.trim().is_empty() {
                reasons.push("metadata row has no key".to_string());
            }
            let value = if value.trim().is_empty() {
                reasons.push("metadata row has no value".to_string());
                "-".to_string()
            } else {
                value.clone()
            };
            Block::MetadataRow {
                key: key.clone(),
                value,
            }
        }

        Block::Divider => Block::Divider,
    };
    (repaired, reasons)
}

/// `score / max` clamped to `0.0..=1.0`, or `None` when `max` is unusable.
pub fn progress_ratio(score: f64, max: f64) -> Option<f64> {
    if !max.is_finite() || max <= 0.0 || !score.is_finite() {
        return None;
    }
    Some((score / max).clamp(0.0, 1.0))
}

/// Format a score without a trailing `.0` for whole numbers.
pub fn format_score(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

// ── Measurement ────────────────────────────────────────────────

/// Where one chip of a tag row sits, relative to the block's top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct ChipSlot {
    pub x: f64,
    pub row: usize,
    pub width: f64,
    pub text: String,
}

/// Flow chips left to right, wrapping to a new row when the next chip would
/// pass `max_width`. A chip wider than the row on its own is truncated.
pub fn layout_chips(tags: &[String], max_width: f64) -> Vec<ChipSlot> {
    let style = chip_style();
    let mut slots = Vec::new();
    let mut x = 0.0;
    let mut row = 0;

    for tag in tags {
        let label = text::truncate_to_width(tag, &style, max_width - 2.0 * CHIP_PADDING_X);
        if label.is_empty() {
            continue;
        }
        let width = text::measure_width(&label, &style) + 2.0 * CHIP_PADDING_X;
        if x > 0.0 && x + width > max_width {
            row += 1;
            x = 0.0;
        }
        slots.push(ChipSlot {
            x,
            row,
            width,
            text: label,
        });
        x += width + CHIP_GAP;
    }

    slots
}

pub fn chip_row_count(slots: &[ChipSlot]) -> usize {
    slots.last().map_or(0, |s| s.row + 1)
}

/// A measured block, ready for placement.
#[derive(Debug, Clone, PartialEq)]
pub enum Measured {
    /// Splittable text, placed line by line.
    Lines {
        wrapped: WrappedText,
        style: TextStyle,
    },
    /// An atomic block of fixed height.
    Fixed { height: f64 },
    /// An atomic tag row with its chip positions.
    Chips { slots: Vec<ChipSlot>, height: f64 },
}

impl Measured {
    pub fn height(&self) -> f64 {
        match self {
            Measured::Lines { wrapped, .. } => wrapped.height(),
            Measured::Fixed { height } | Measured::Chips { height, .. } => *height,
        }
    }
}

/// Measure `block` at `max_width`. Zero height means there is nothing to draw.
pub fn measure(block: &Block, config: &LayoutConfig, max_width: f64) -> Measured {
    match block {
        Block::Heading { text, level } => {
            let style = heading_style(config, *level);
            Measured::Lines {
                wrapped: text::wrap(text, &style, max_width),
                style,
            }
        }
        Block::Paragraph { text } => {
            let style = body_style(config);
            Measured::Lines {
                wrapped: text::wrap(text, &style, max_width),
                style,
            }
        }
        Block::StatCard { .. } => Measured::Fixed {
            height: 2.0 * STAT_CARD_PADDING
                + stat_label_style(config).line_box()
                + STAT_CARD_ROW_HEIGHT,
        },
        Block::ProgressBar { .. } => Measured::Fixed {
            height: body_style(config).line_box() + BAR_LABEL_GAP + BAR_HEIGHT,
        },
        Block::TagRow { tags } => {
            let slots = layout_chips(tags, max_width);
            let height = chip_row_count(&slots) as f64 * CHIP_ROW_HEIGHT;
            Measured::Chips { slots, height }
        }
        Block::MetadataRow { .. } => Measured::Fixed {
            height: 2.0 * METADATA_PADDING + body_style(config).line_box(),
        },
        Block::Divider => Measured::Fixed {
            height: DIVIDER_HEIGHT,
        },
    }
}

impl Block {
    /// Height of this block at `max_width` under `config`.
    pub fn measure(&self, config: &LayoutConfig, max_width: f64) -> f64 {
        measure(self, config, max_width).height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LayoutConfig {
        LayoutConfig::default()
    }

    #[test]
    fn paragraph_height_is_lines_times_line_height() {
        let block = Block::paragraph("one two three four five six seven eight nine ten");
        let m = measure(&block, &config(), 60.0);
        match &m {
            Measured::Lines { wrapped, .. } => {
                assert!(wrapped.line_count() > 1);
                assert!((m.height() - wrapped.line_count() as f64 * 14.0).abs() < 1e-9);
            }
            other => panic!("expected lines, got {other:?}"),
        }
    }

    #[test]
    fn measurement_is_deterministic() {
        let block = Block::paragraph("The same text measured twice gives the same answer.");
        assert_eq!(
            block.measure(&config(), 120.0),
            block.measure(&config(), 120.0)
        );
    }

    #[test]
    fn atomic_heights_are_fixed() {
        let cfg = config();
        let card = Block::stat_card("Stars", "1.2k").measure(&cfg, 500.0);
        assert!((card - (16.0 + 8.5 * 1.4 + 24.0)).abs() < 1e-9);
        let bar = Block::progress_bar("Health", 7.0, 10.0).measure(&cfg, 500.0);
        assert!((bar - (14.0 + 4.0 + 8.0)).abs() < 1e-9);
        let row = Block::metadata_row("License", "MIT").measure(&cfg, 500.0);
        assert!((row - 20.0).abs() < 1e-9);
        assert_eq!(Block::Divider.measure(&cfg, 500.0), DIVIDER_HEIGHT);
    }

    #[test]
    fn chips_wrap_into_rows() {
        let tags: Vec<String> = (0..12).map(|i| format!("topic-{i}")).collect();
        let wide = layout_chips(&tags, 2000.0);
        assert_eq!(chip_row_count(&wide), 1);
        let narrow = layout_chips(&tags, 120.0);
        assert!(chip_row_count(&narrow) > 1);
        for slot in &narrow {
            assert!(slot.x + slot.width <= 120.0 + 1e-9);
        }
    }

    #[test]
    fn overwide_chip_is_truncated() {
        let tags = vec!["a-very-long-tag-name-that-cannot-fit".to_string()];
        let slots = layout_chips(&tags, 60.0);
        assert_eq!(slots.len(), 1);
        assert!(slots[0].text.ends_with("..."));
        assert!(slots[0].width <= 60.0 + 1e-9);
    }

    #[test]
    fn empty_tag_row_measures_zero() {
        assert_eq!(Block::tag_row::<&str>(&[]).measure(&config(), 300.0), 0.0);
    }

    #[test]
    fn normalize_accepts_well_formed_blocks() {
        for block in [
            Block::heading("Title", 2),
            Block::paragraph("Body"),
            Block::stat_card("Stars", "10"),
            Block::progress_bar("Health", 5.0, 10.0),
            Block::tag_row(&["rust"]),
            Block::metadata_row("License", "MIT"),
            Block::Divider,
        ] {
            let (repaired, reasons) = normalize(&block);
            assert!(reasons.is_empty(), "{block:?}: {reasons:?}");
            assert_eq!(repaired, block);
        }
    }

    #[test]
    fn normalize_repairs_progress_bar() {
        let (repaired, reasons) = normalize(&Block::progress_bar("Docs", 5.0, 0.0));
        assert_eq!(reasons.len(), 1);
        assert_eq!(repaired, Block::progress_bar("Docs", 5.0, 0.0));
        assert_eq!(progress_ratio(5.0, 0.0), None);

        let (repaired, reasons) = normalize(&Block::progress_bar("Docs", 15.0, 10.0));
        assert_eq!(reasons.len(), 1);
        assert_eq!(repaired, Block::progress_bar("Docs", 10.0, 10.0));

        let (repaired, _) = normalize(&Block::progress_bar("Docs", f64::NAN, 10.0));
        assert_eq!(repaired, Block::progress_bar("Docs", 0.0, 10.0));
    }

    #[test]
    fn normalize_clamps_heading_level() {
        let (repaired, reasons) = normalize(&Block::heading("Deep", 9));
        assert_eq!(repaired, Block::heading("Deep", 6));
        assert_eq!(reasons.len(), 1);
    }

    #[test]
    fn normalize_drops_blank_tags() {
        let (repaired, reasons) = normalize(&Block::tag_row(&["rust", " ", ""]));
        assert_eq!(repaired, Block::tag_row(&["rust"]));
        assert_eq!(reasons.len(), 1);
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(72.0), "72");
        assert_eq!(format_score(7.26), "7.3");
    }
}
