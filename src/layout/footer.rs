//! # Footer Pass
//!
//! Runs once composition is finished and the page count is final. Stamps
//! every page with a separator rule, the footer label, the generation stamp
//! and "Page i of N" inside the region the cursor reserved at the bottom of
//! the content area. Footers are appended after the page's content
//! primitives; content is never touched.

use chrono::{DateTime, Utc};

use super::{Document, Page};
use crate::font::StandardFont;
use crate::model::{LayoutConfig, Metadata};
use crate::render::Primitive;
use crate::style::{palette, Style, TextStyle};
use crate::text::{measure_width, truncate_to_width};

/// Distance from the top of the footer region to the separator rule.
const RULE_OFFSET: f64 = 4.0;
const RULE_THICKNESS: f64 = 0.5;
/// Distance from the top of the footer region to the footer text.
pub const TEXT_OFFSET: f64 = 8.0;
pub const FOOTER_LINE_HEIGHT: f64 = 1.2;

pub fn footer_style(config: &LayoutConfig) -> TextStyle {
    TextStyle::new(
        StandardFont::Helvetica,
        config.footer_font_size,
        FOOTER_LINE_HEIGHT,
        palette::MUTED,
    )
}

pub fn page_label(index: usize, total: usize) -> String {
    format!("Page {} of {}", index + 1, total)
}

pub fn generated_label(at: &DateTime<Utc>) -> String {
    format!("Generated {}", at.format("%Y-%m-%d %H:%M UTC"))
}

/// Stamp footers on every page of `document` and mark it finalized.
/// Calling it again on a finalized document does nothing.
pub fn stamp_footers(document: &mut Document, config: &LayoutConfig) {
    if document.is_finalized() {
        return;
    }
    let total = document.pages.len();
    let metadata = document.metadata.clone();
    for page in document.pages.iter_mut() {
        let primitives = footer_primitives(page, total, &metadata, config);
        page.push_footer(primitives);
    }
    document.finalize();
    log::debug!("stamped footers on {total} page(s)");
}

/// Gap between neighbouring footer texts.
const TEXT_GAP: f64 = 8.0;

/// The page label is laid out first, right-aligned and never shortened.
/// The generation stamp is centered in what is left, and the footer label
/// takes the space to its left.
fn footer_primitives(
    page: &Page,
    total: usize,
    metadata: &Metadata,
    config: &LayoutConfig,
) -> Vec<Primitive> {
    let region = page.footer_region;
    let style = footer_style(config);
    let text_y = region.y + TEXT_OFFSET;
    let mut out = vec![Primitive::Rect {
        x: region.x,
        y: region.y + RULE_OFFSET,
        width: region.width,
        height: RULE_THICKNESS,
        style: Style::filled(palette::RULE),
    }];

    let mut push_text = |x: f64, text: String| {
        if text.is_empty() {
            return;
        }
        out.push(Primitive::TextRun {
            x,
            y: text_y,
            width: measure_width(&text, &style),
            text,
            style,
        });
    };

    let page_text = page_label(page.index, total);
    let page_w = measure_width(&page_text, &style);
    push_text(region.right() - page_w, page_text);

    // Everything else ends one gap before the page label.
    let mut left_limit = region.right() - page_w - TEXT_GAP;

    if let Some(at) = &metadata.generated_at {
        // Centered on the page, so it may use the same width on both sides.
        let budget = region.width - 2.0 * (page_w + TEXT_GAP);
        let stamp = truncate_to_width(&generated_label(at), &style, budget);
        if !stamp.is_empty() {
            let width = measure_width(&stamp, &style);
            let x = region.x + (region.width - width) / 2.0;
            push_text(x, stamp);
            left_limit = x - TEXT_GAP;
        }
    }

    if let Some(label) = &metadata.footer_label {
        push_text(region.x, truncate_to_width(label, &style, left_limit - region.x));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;
    use crate::model::{Block, Edges, PageConfig, PageSize, ReportInput, Section};
    use chrono::TimeZone;

    fn three_page_document() -> (Document, LayoutConfig) {
        let input = ReportInput {
            sections: vec![
                Section::new("One", vec![Block::paragraph("first")]),
                Section::new("Two", vec![Block::paragraph("second")]),
                Section::new("Three", vec![Block::paragraph("third")]),
            ],
            ..Default::default()
        };
        let config = input.layout.clone();
        (LayoutEngine::new().compose(&input), config)
    }

    #[test]
    fn every_page_gets_page_i_of_n() {
        let (mut doc, config) = three_page_document();
        assert_eq!(doc.page_count(), 3);
        stamp_footers(&mut doc, &config);
        for (i, page) in doc.pages.iter().enumerate() {
            let expected = format!("Page {} of 3", i + 1);
            assert!(
                page.footer().iter().any(|p| p.text() == Some(expected.as_str())),
                "page {i} is missing {expected:?}"
            );
        }
    }

    #[test]
    fn footers_stay_in_footer_region() {
        let (mut doc, config) = three_page_document();
        doc.metadata.footer_label = Some("Data from the public API".to_string());
        doc.metadata.generated_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
        stamp_footers(&mut doc, &config);
        for page in &doc.pages {
            assert_eq!(page.footer().len(), 4);
            for p in page.footer() {
                assert!(p.bounds().within(&page.footer_region, 1e-6), "{p:?}");
            }
        }
        assert!(doc.pages[0]
            .footer()
            .iter()
            .any(|p| p.text() == Some("Generated 2024-03-01 09:30 UTC")));
    }

    #[test]
    fn stamping_twice_is_a_no_op() {
        let (mut doc, config) = three_page_document();
        stamp_footers(&mut doc, &config);
        let before = doc.pages[0].primitives().len();
        stamp_footers(&mut doc, &config);
        assert_eq!(doc.pages[0].primitives().len(), before);
    }

    #[test]
    fn content_is_untouched() {
        let (mut doc, config) = three_page_document();
        let content: Vec<_> = doc.pages.iter().map(|p| p.content().to_vec()).collect();
        stamp_footers(&mut doc, &config);
        for (page, before) in doc.pages.iter().zip(content) {
            assert_eq!(page.content(), before.as_slice());
        }
    }

    #[test]
    fn narrow_page_keeps_the_whole_page_label() {
        let input = ReportInput {
            metadata: Metadata {
                footer_label: Some("Source: public repository API".to_string()),
                generated_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
                ..Default::default()
            },
            page: PageConfig {
                size: PageSize::Custom {
                    width: 150.0,
                    height: 400.0,
                },
                margin: Edges::uniform(20.0),
            },
            sections: vec![Section::new("Narrow", vec![Block::paragraph("text")])],
            ..Default::default()
        };
        let doc = LayoutEngine::new().layout(&input);
        assert!(doc.diagnostics.is_empty(), "{:?}", doc.diagnostics);

        let page = &doc.pages[0];
        let texts: Vec<&str> = page.footer().iter().filter_map(|p| p.text()).collect();
        assert!(texts.contains(&"Page 1 of 1"), "{texts:?}");
        for p in page.footer() {
            assert!(p.bounds().within(&page.footer_region, 1e-6), "{p:?}");
        }
        let runs: Vec<_> = page.footer().iter().skip(1).map(|p| p.bounds()).collect();
        for pair in runs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a.right() <= b.x + 1e-6 || b.right() <= a.x + 1e-6, "{a:?} overlaps {b:?}");
        }
    }
}
