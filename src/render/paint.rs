//! Lowering of positioned blocks into primitives.
//!
//! Painters reuse the constants and styles from `layout::block`, so what
//! they draw occupies exactly the height that measurement reported.

use super::Primitive;
use crate::font::StandardFont;
use crate::layout::block::*;
use crate::model::{Block, ColorBand, LayoutConfig, TrendDirection};
use crate::style::{palette, Color, Style, TextStyle};
use crate::text::{measure_width, truncate_to_width};

/// A single-line text run, or nothing for empty text.
fn text_run(x: f64, y: f64, text: String, style: TextStyle) -> Option<Primitive> {
    if text.is_empty() {
        return None;
    }
    Some(Primitive::TextRun {
        x,
        y,
        width: measure_width(&text, &style),
        text,
        style,
    })
}

/// One text run per non-blank line, stacked from `y`. A line holding a
/// single word wider than `max_width` is cut short with `...`.
pub fn paint_lines(
    lines: &[String],
    style: &TextStyle,
    x: f64,
    y: f64,
    max_width: f64,
) -> Vec<Primitive> {
    let line_height = style.line_box();
    lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let text = if measure_width(line, style) > max_width {
                truncate_to_width(line, style, max_width)
            } else {
                line.clone()
            };
            text_run(x, y + i as f64 * line_height, text, *style)
        })
        .collect()
}

pub fn band_color(band: ColorBand) -> Color {
    match band {
        ColorBand::Low => palette::BAND_LOW,
        ColorBand::Medium => palette::BAND_MEDIUM,
        ColorBand::High => palette::BAND_HIGH,
    }
}

fn trend_color(direction: TrendDirection) -> Color {
    match direction {
        TrendDirection::Up => palette::TREND_UP,
        TrendDirection::Down => palette::TREND_DOWN,
        TrendDirection::Flat => palette::TREND_FLAT,
    }
}

/// Paint a whole block whose top-left corner is at (`x`, `y`) in a column of
/// `width`. `measured` must come from measuring the same block at `width`.
pub fn paint_block(
    block: &Block,
    measured: &Measured,
    config: &LayoutConfig,
    x: f64,
    y: f64,
    width: f64,
) -> Vec<Primitive> {
    if let Measured::Lines { wrapped, style } = measured {
        return paint_lines(&wrapped.lines, style, x, y, width);
    }
    if let Measured::Chips { slots, .. } = measured {
        return paint_chips(slots, x, y);
    }

    let height = measured.height();
    match block {
        Block::StatCard {
            label,
            value,
            trend,
            accent_color,
        } => {
            let mut out = Vec::new();
            let o = STAT_CARD_STROKE / 2.0;
            out.push(Primitive::RoundedRect {
                x: x + o,
                y: y + o,
                width: width - 2.0 * o,
                height: height - 2.0 * o,
                style: Style::filled(palette::CARD_FILL)
                    .with_stroke(palette::CARD_STROKE, STAT_CARD_STROKE)
                    .with_radius(STAT_CARD_RADIUS),
            });
            // Accent stripe along the left edge, clear of the rounded corners.
            out.push(Primitive::Rect {
                x: x + o,
                y: y + STAT_CARD_RADIUS,
                width: STAT_ACCENT_WIDTH,
                height: (height - 2.0 * STAT_CARD_RADIUS).max(0.0),
                style: Style::filled(accent_color.unwrap_or(palette::ACCENT)),
            });

            let inner_x = x + STAT_CARD_PADDING + STAT_ACCENT_WIDTH;
            let inner_w = width - 2.0 * STAT_CARD_PADDING - STAT_ACCENT_WIDTH;
            let label_style = stat_label_style(config);
            let value_style = stat_value_style();
            let row_y = y + STAT_CARD_PADDING + label_style.line_box();
            let row_mid = row_y + STAT_CARD_ROW_HEIGHT / 2.0;

            let mut trend_width = 0.0;
            if let Some(trend) = trend {
                let color = trend_color(trend.direction);
                let style = trend_style().with_color(color);
                let caption = truncate_to_width(&trend.text, &style, inner_w / 3.0);
                let caption_w = measure_width(&caption, &style);
                let right = inner_x + inner_w;
                out.push(Primitive::Circle {
                    cx: right - caption_w - 4.0 - TREND_MARKER_RADIUS,
                    cy: row_mid,
                    radius: TREND_MARKER_RADIUS,
                    style: Style::filled(color),
                });
                out.extend(text_run(
                    right - caption_w,
                    row_mid - style.line_box() / 2.0,
                    caption,
                    style,
                ));
                trend_width = caption_w + 4.0 + 2.0 * TREND_MARKER_RADIUS + 8.0;
            }

            out.extend(text_run(
                inner_x,
                y + STAT_CARD_PADDING,
                truncate_to_width(label, &label_style, inner_w),
                label_style,
            ));
            out.extend(text_run(
                inner_x,
                row_mid - value_style.line_box() / 2.0,
                truncate_to_width(value, &value_style, inner_w - trend_width),
                value_style,
            ));
            out
        }

        Block::ProgressBar {
            label,
            score,
            max,
            color_band,
        } => {
            let mut out = Vec::new();
            let label_style = body_style(config);
            let score_style = TextStyle::new(
                StandardFont::HelveticaBold,
                label_style.size,
                label_style.line_height,
                palette::MUTED,
            );
            let ratio = progress_ratio(*score, *max);
            let score_text = match ratio {
                Some(_) => format!("{} / {}", format_score(*score), format_score(*max)),
                None => "n/a".to_string(),
            };
            let score_text = truncate_to_width(&score_text, &score_style, width / 3.0);
            let score_w = measure_width(&score_text, &score_style);

            out.extend(text_run(
                x,
                y,
                truncate_to_width(label, &label_style, width - score_w - 8.0),
                label_style,
            ));
            out.extend(text_run(x + width - score_w, y, score_text, score_style));

            let fraction = ratio.unwrap_or(0.0);
            let band = color_band.unwrap_or_else(|| ColorBand::for_ratio(fraction));
            out.push(Primitive::FilledBar {
                x,
                y: y + label_style.line_box() + BAR_LABEL_GAP,
                width,
                height: BAR_HEIGHT,
                fraction,
                track: palette::TRACK,
                fill: band_color(band),
            });
            out
        }

        Block::MetadataRow { key, value } => {
            let mut out = Vec::new();
            let key_style = metadata_key_style(config);
            let value_style = body_style(config);
            let key_w = width * METADATA_KEY_FRACTION;
            out.extend(text_run(
                x,
                y + METADATA_PADDING,
                truncate_to_width(key, &key_style, key_w - 8.0),
                key_style,
            ));
            out.extend(text_run(
                x + key_w,
                y + METADATA_PADDING,
                truncate_to_width(value, &value_style, width - key_w),
                value_style,
            ));
            out.push(Primitive::Rect {
                x,
                y: y + height - HAIRLINE,
                width,
                height: HAIRLINE,
                style: Style::filled(palette::RULE),
            });
            out
        }

        Block::Divider => vec![Primitive::Rect {
            x,
            y: y + (DIVIDER_HEIGHT - DIVIDER_THICKNESS) / 2.0,
            width,
            height: DIVIDER_THICKNESS,
            style: Style::filled(palette::RULE),
        }],

        // Text and tag rows never reach here with a fixed measure.
        Block::Heading { .. } | Block::Paragraph { .. } | Block::TagRow { .. } => Vec::new(),
    }
}

fn paint_chips(slots: &[ChipSlot], x: f64, y: f64) -> Vec<Primitive> {
    slots
        .iter()
        .map(|slot| Primitive::Chip {
            x: x + slot.x,
            y: y + slot.row as f64 * CHIP_ROW_HEIGHT,
            width: slot.width,
            height: CHIP_HEIGHT,
            text: slot.text.clone(),
            fill: palette::CHIP_FILL,
            text_style: chip_style(),
        })
        .collect()
}
