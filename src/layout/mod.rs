//! # Page-Aware Layout Engine
//!
//! Walks the report's sections and blocks once, in order, and places each
//! block directly onto a page with known dimensions and remaining space.
//! There is no infinite canvas that gets sliced afterwards:
//!
//! 1. Measure the block at the content width
//! 2. Ask the cursor whether it fits in what is left of the page
//! 3. Atomic blocks that don't fit move to a fresh page whole
//! 4. Paragraphs and headings place the lines that fit and continue the rest
//!    on the next page
//! 5. Lower the placed block into primitives on the page it landed on
//!
//! Footers need the final page count, so they are stamped by a separate pass
//! (`footer::stamp_footers`) after composition. The cursor reserves their
//! region up front so content never has to move.
//!
//! Malformed input never aborts layout. Bad config values fall back to
//! defaults, bad block fields are repaired, and oversized atomic blocks are
//! clipped; each case leaves a [`Diagnostic`] on the document.

pub mod block;
pub mod cursor;
pub mod footer;
pub mod page_break;

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::error::QuireError;
use crate::model::*;
use crate::render::paint::{paint_block, paint_lines};
use crate::render::{Bounds, Primitive};
use crate::style::TextStyle;
use crate::text::WrappedText;
use block::Measured;
use cursor::Cursor;

/// A fully laid-out report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: Edges,
    pub metadata: Metadata,
    pub pages: Vec<Page>,
    /// Where each input block landed, in input order.
    pub placements: Vec<BlockPlacement>,
    pub diagnostics: Vec<Diagnostic>,
    finalized: bool,
}

impl Document {
    /// Always at least 1.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True once footers have been stamped.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub(crate) fn finalize(&mut self) {
        self.finalized = true;
    }

    /// The placement record of block `block` in section `section`, if it
    /// produced any output.
    pub fn placement(&self, section: usize, block: usize) -> Option<&BlockPlacement> {
        self.placements
            .iter()
            .find(|p| p.section == section && p.block == block)
    }

    /// Serialize to PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, QuireError> {
        crate::pdf::PdfWriter::new().write(self)
    }

    /// Pretty-printed JSON snapshot of the pages, placements and diagnostics.
    pub fn to_json(&self) -> Result<String, QuireError> {
        serde_json::to_string_pretty(self).map_err(QuireError::Snapshot)
    }
}

/// One page of primitives. Content primitives come first, footer primitives
/// after them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub index: usize,
    pub width: f64,
    pub height: f64,
    /// Margin box minus the footer region.
    pub content_area: Bounds,
    pub footer_region: Bounds,
    primitives: Vec<Primitive>,
    #[serde(skip)]
    content_len: usize,
}

impl Page {
    fn new(index: usize, template: &PageTemplate) -> Self {
        Self {
            index,
            width: template.width,
            height: template.height,
            content_area: template.content_area,
            footer_region: template.footer_region,
            primitives: Vec::new(),
            content_len: 0,
        }
    }

    /// Everything on the page, in paint order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn content(&self) -> &[Primitive] {
        &self.primitives[..self.content_len]
    }

    pub fn footer(&self) -> &[Primitive] {
        &self.primitives[self.content_len..]
    }

    fn push_content(&mut self, primitives: Vec<Primitive>) -> Range<usize> {
        debug_assert_eq!(self.content_len, self.primitives.len());
        let start = self.primitives.len();
        self.primitives.extend(primitives);
        self.content_len = self.primitives.len();
        start..self.content_len
    }

    pub(crate) fn push_footer(&mut self, primitives: Vec<Primitive>) {
        self.primitives.extend(primitives);
    }
}

/// Where an input block landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPlacement {
    pub section: usize,
    pub block: usize,
    pub kind: &'static str,
    pub atomic: bool,
    /// Part of the block was clipped at the bottom of the page.
    pub truncated: bool,
    /// One entry per page the block touches. Atomic blocks have exactly one.
    pub fragments: Vec<Fragment>,
}

impl BlockPlacement {
    pub fn pages(&self) -> Vec<usize> {
        self.fragments.iter().map(|f| f.page_index).collect()
    }
}

/// The part of a block on one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub page_index: usize,
    pub y: f64,
    pub height: f64,
    /// Indices into the page's primitive list.
    pub primitives: Range<usize>,
}

/// A non-fatal problem found during layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DiagnosticKind {
    /// An atomic block taller than a whole empty page. It was placed alone
    /// and clipped at the bottom of the content area.
    OversizedAtomicBlock { height: f64, available: f64 },
    /// A block had malformed fields and was repaired.
    InvalidBlock { reason: String },
    /// A page or layout setting was unusable and fell back to its default.
    InvalidConfig { reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::OversizedAtomicBlock { height, available } => write!(
                f,
                "oversized block ({height:.1}pt on a page with {available:.1}pt available)"
            )?,
            DiagnosticKind::InvalidBlock { reason } => write!(f, "invalid block: {reason}")?,
            DiagnosticKind::InvalidConfig { reason } => write!(f, "invalid config: {reason}")?,
        }
        if let (Some(section), Some(block)) = (self.section, self.block) {
            write!(f, " [section {section}, block {block}]")?;
        }
        if let Some(page) = self.page_index {
            write!(f, " on page {}", page + 1)?;
        }
        Ok(())
    }
}

/// Smallest usable content box, in points, before page settings are
/// rejected.
const MIN_CONTENT_EXTENT: f64 = 72.0;

/// The geometry shared by every page.
#[derive(Debug, Clone, Copy)]
struct PageTemplate {
    width: f64,
    height: f64,
    content_area: Bounds,
    footer_region: Bounds,
}

impl PageTemplate {
    fn new(page: &PageConfig, config: &LayoutConfig) -> Self {
        let (width, height) = page.size.dimensions();
        let m = page.margin;
        let content_w = width - m.horizontal();
        let content_h = height - m.vertical() - config.footer_height;
        Self {
            width,
            height,
            content_area: Bounds::new(m.left, m.top, content_w, content_h),
            footer_region: Bounds::new(
                m.left,
                m.top + content_h,
                content_w,
                config.footer_height,
            ),
        }
    }
}

/// Replace unusable layout metrics with their defaults.
fn sanitize_layout(config: &LayoutConfig) -> (LayoutConfig, Vec<String>) {
    let defaults = LayoutConfig::default();
    let mut out = config.clone();
    let mut reasons = Vec::new();

    let mut check = |name: &str, value: &mut f64, default: f64, ok: bool| {
        if !ok {
            reasons.push(format!("{name} {value} is out of range, using {default}"));
            *value = default;
        }
    };

    let v = out.body_font_size;
    check(
        "bodyFontSize",
        &mut out.body_font_size,
        defaults.body_font_size,
        v.is_finite() && (4.0..=72.0).contains(&v),
    );
    let v = out.line_height;
    check(
        "lineHeight",
        &mut out.line_height,
        defaults.line_height,
        v.is_finite() && (1.0..=3.0).contains(&v),
    );
    let v = out.block_gap;
    check(
        "blockGap",
        &mut out.block_gap,
        defaults.block_gap,
        v.is_finite() && (0.0..=72.0).contains(&v),
    );
    let v = out.footer_height;
    check(
        "footerHeight",
        &mut out.footer_height,
        defaults.footer_height,
        v.is_finite() && (LayoutConfig::MIN_FOOTER_HEIGHT..=144.0).contains(&v),
    );
    // The footer line must fit inside the reserved region.
    let v = out.footer_font_size;
    let fits = footer::TEXT_OFFSET + v * footer::FOOTER_LINE_HEIGHT <= out.footer_height;
    check(
        "footerFontSize",
        &mut out.footer_font_size,
        defaults.footer_font_size,
        v.is_finite() && v >= 4.0 && fits,
    );

    (out, reasons)
}

/// Reject page settings that leave no room for content.
fn sanitize_page(page: &PageConfig, config: &LayoutConfig) -> (PageConfig, Option<String>) {
    let (w, h) = page.size.dimensions();
    let m = page.margin;
    let margins_ok = [m.top, m.right, m.bottom, m.left]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0);
    let size_ok = w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0;

    if margins_ok && size_ok {
        let content_w = w - m.horizontal();
        let content_h = h - m.vertical() - config.footer_height;
        if content_w >= MIN_CONTENT_EXTENT && content_h >= MIN_CONTENT_EXTENT {
            return (page.clone(), None);
        }
    }

    let reason = format!(
        "page {w}x{h}pt with margins {}/{}/{}/{} leaves no room for content, using A4 with 20mm margins",
        m.top, m.right, m.bottom, m.left
    );
    (PageConfig::default(), Some(reason))
}

/// The main layout engine.
pub struct LayoutEngine;

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compose a report into pages. Footers are not stamped yet; see
    /// [`LayoutEngine::layout`] for the full pipeline.
    pub fn compose(&self, input: &ReportInput) -> Document {
        let mut diagnostics = Vec::new();

        let (config, config_issues) = sanitize_layout(&input.layout);
        let (page, page_issue) = sanitize_page(&input.page, &config);
        for reason in config_issues.into_iter().chain(page_issue) {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::InvalidConfig { reason },
                section: None,
                block: None,
                page_index: None,
            });
        }

        let template = PageTemplate::new(&page, &config);
        let mut composer = Composer {
            config: &config,
            cursor: Cursor::new(&page, config.footer_height),
            template,
            pages: vec![Page::new(0, &template)],
            placements: Vec::new(),
            diagnostics,
            break_pending: false,
            title_only: false,
        };
        for d in &composer.diagnostics {
            log::warn!("{d}");
        }

        composer.place_title(&input.metadata);
        for (index, section) in input.sections.iter().enumerate() {
            composer.place_section(index, section);
        }

        log::info!(
            "composed {} block(s) onto {} page(s), {} diagnostic(s)",
            composer.placements.len(),
            composer.pages.len(),
            composer.diagnostics.len()
        );

        Document {
            page_width: template.width,
            page_height: template.height,
            margin: page.margin,
            metadata: input.metadata.clone(),
            pages: composer.pages,
            placements: composer.placements,
            diagnostics: composer.diagnostics,
            finalized: false,
        }
    }

    /// Compose, then stamp footers. The returned document is final.
    pub fn layout(&self, input: &ReportInput) -> Document {
        let mut document = self.compose(input);
        let (config, _) = sanitize_layout(&input.layout);
        footer::stamp_footers(&mut document, &config);
        document
    }
}

/// Mutable state for one composition run.
struct Composer<'a> {
    config: &'a LayoutConfig,
    cursor: Cursor,
    template: PageTemplate,
    pages: Vec<Page>,
    placements: Vec<BlockPlacement>,
    diagnostics: Vec<Diagnostic>,
    /// The current section is major and must open a new page before its
    /// first visible content.
    break_pending: bool,
    /// The current page holds only the document title.
    title_only: bool,
}

impl Composer<'_> {
    fn place_title(&mut self, metadata: &Metadata) {
        let Some(title) = metadata.title.as_deref() else {
            return;
        };
        if title.trim().is_empty() {
            return;
        }
        let style = block::title_style(self.config);
        let wrapped = crate::text::wrap(title, &style, self.template.content_area.width);
        self.place_text(&wrapped, &style);
        self.cursor.skip(2.0 * self.config.block_gap);
        self.title_only = true;
    }

    /// Major sections start on a fresh page. The break waits for the first
    /// thing the section actually draws, so a section that draws nothing
    /// leaves no blank page behind.
    fn place_section(&mut self, index: usize, section: &Section) {
        self.break_pending = section.major && !self.cursor.is_page_empty() && !self.title_only;

        if !section.title.trim().is_empty() {
            self.start_content(index);
            let style = block::heading_style(self.config, 1);
            let wrapped =
                crate::text::wrap(&section.title, &style, self.template.content_area.width);
            self.place_text(&wrapped, &style);
            self.cursor.skip(self.config.block_gap);
        }

        for (block_index, block) in section.blocks.iter().enumerate() {
            self.place_block(index, block_index, block);
        }
        self.break_pending = false;
    }

    /// Called before a section draws anything: resolves a pending section
    /// break.
    fn start_content(&mut self, section: usize) {
        if self.break_pending {
            self.break_pending = false;
            log::debug!("section {section} starts a new page");
            self.cursor.break_page();
            self.ensure_page(self.cursor.page_index());
        }
        self.title_only = false;
    }

    fn place_block(&mut self, section: usize, index: usize, input: &Block) {
        let (block, issues) = block::normalize(input);
        for reason in issues {
            self.report(DiagnosticKind::InvalidBlock { reason }, section, index, None);
        }

        let width = self.template.content_area.width;
        let x = self.template.content_area.x;
        let measured = block::measure(&block, self.config, width);
        let height = measured.height();
        if height <= 0.0 {
            return;
        }
        self.start_content(section);

        let (fragments, truncated) = match &measured {
            Measured::Lines { wrapped, style } => {
                let (fragments, overflow) = self.place_text(wrapped, style);
                if let Some(page_index) = overflow {
                    self.report(
                        DiagnosticKind::OversizedAtomicBlock {
                            height: wrapped.line_height,
                            available: self.cursor.available_height(),
                        },
                        section,
                        index,
                        Some(page_index),
                    );
                }
                (fragments, overflow.is_some())
            }
            Measured::Fixed { .. } | Measured::Chips { .. } => {
                let placement = self.cursor.place(height);
                let primitives =
                    paint_block(&block, &measured, self.config, x, placement.y, width);
                let range = self.push(placement.page_index, primitives, placement.overflow);
                if placement.overflow {
                    self.report(
                        DiagnosticKind::OversizedAtomicBlock {
                            height,
                            available: self.cursor.available_height(),
                        },
                        section,
                        index,
                        Some(placement.page_index),
                    );
                }
                let fragment = Fragment {
                    page_index: placement.page_index,
                    y: placement.y,
                    height: height.min(self.cursor.limit() - placement.y),
                    primitives: range,
                };
                (vec![fragment], placement.overflow)
            }
        };

        self.placements.push(BlockPlacement {
            section,
            block: index,
            kind: block.kind_name(),
            atomic: block.is_atomic(),
            truncated,
            fragments,
        });
        self.cursor.skip(self.config.block_gap);
    }

    /// Place wrapped lines, splitting across pages as needed. Returns the
    /// fragments and, if a single line was taller than a whole page, the
    /// page it overflowed on.
    fn place_text(
        &mut self,
        wrapped: &WrappedText,
        style: &TextStyle,
    ) -> (Vec<Fragment>, Option<usize>) {
        let x = self.template.content_area.x;
        let width = self.template.content_area.width;
        let groups = self
            .cursor
            .place_lines(wrapped.line_height, wrapped.line_count());
        let mut fragments = Vec::with_capacity(groups.len());
        let mut overflow = None;

        for group in groups {
            let placement = group.placement;
            let primitives = paint_lines(
                &wrapped.lines[group.lines.clone()],
                style,
                x,
                placement.y,
                width,
            );
            let range = self.push(placement.page_index, primitives, placement.overflow);
            if placement.overflow {
                overflow = Some(placement.page_index);
            }
            let height = crate::text::height(group.lines.len(), wrapped.line_height);
            fragments.push(Fragment {
                page_index: placement.page_index,
                y: placement.y,
                height: height.min(self.cursor.limit() - placement.y),
                primitives: range,
            });
        }

        (fragments, overflow)
    }

    /// Append primitives to a page, clipping them at the content limit when
    /// the placement overflowed.
    fn push(&mut self, page_index: usize, primitives: Vec<Primitive>, clip: bool) -> Range<usize> {
        self.ensure_page(page_index);
        let primitives = if clip {
            let limit = self.cursor.limit();
            primitives
                .iter()
                .filter_map(|p| p.clip_bottom(limit))
                .collect()
        } else {
            primitives
        };
        self.pages[page_index].push_content(primitives)
    }

    fn ensure_page(&mut self, page_index: usize) {
        while self.pages.len() <= page_index {
            let page = Page::new(self.pages.len(), &self.template);
            self.pages.push(page);
        }
    }

    fn report(
        &mut self,
        kind: DiagnosticKind,
        section: usize,
        block: usize,
        page_index: Option<usize>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            section: Some(section),
            block: Some(block),
            page_index,
        };
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> LayoutEngine {
        LayoutEngine::new()
    }

    fn make_input(sections: Vec<Section>) -> ReportInput {
        ReportInput {
            sections,
            ..Default::default()
        }
    }

    fn long_text(words: usize) -> String {
        (0..words)
            .map(|i| format!("word{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn empty_report_has_one_page() {
        let doc = engine().layout(&make_input(vec![]));
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].content().is_empty());
        assert!(doc.is_finalized());
    }

    #[test]
    fn blocks_flow_downward() {
        let doc = engine().compose(&make_input(vec![Section::new(
            "Overview",
            vec![
                Block::paragraph("First"),
                Block::stat_card("Stars", "10"),
                Block::Divider,
            ],
        )]));
        let ys: Vec<f64> = doc.placements.iter().map(|p| p.fragments[0].y).collect();
        assert!(ys.windows(2).all(|w| w[0] < w[1]), "{ys:?}");
    }

    #[test]
    fn major_sections_start_new_pages() {
        let doc = engine().compose(&make_input(vec![
            Section::new("A", vec![Block::paragraph("a")]),
            Section::new("B", vec![Block::paragraph("b")]),
            Section::minor("C", vec![Block::paragraph("c")]),
        ]));
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.placement(0, 0).unwrap().pages(), vec![0]);
        assert_eq!(doc.placement(1, 0).unwrap().pages(), vec![1]);
        assert_eq!(doc.placement(2, 0).unwrap().pages(), vec![1]);
    }

    #[test]
    fn first_major_section_does_not_leave_blank_page() {
        let doc = engine().compose(&make_input(vec![Section::new(
            "Only",
            vec![Block::paragraph("x")],
        )]));
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn long_paragraph_spans_pages() {
        let doc = engine().compose(&make_input(vec![Section::new(
            "Body",
            vec![Block::paragraph(&long_text(2500))],
        )]));
        let placement = doc.placement(0, 0).unwrap();
        assert!(placement.fragments.len() > 1);
        let pages = placement.pages();
        assert!(pages.windows(2).all(|w| w[1] == w[0] + 1));
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn atomic_blocks_land_on_one_page() {
        let mut blocks = vec![Block::paragraph(&long_text(380))];
        blocks.extend((0..6).map(|i| Block::stat_card(&format!("Card {i}"), "42")));
        let doc = engine().compose(&make_input(vec![Section::new("Cards", blocks)]));
        for p in doc.placements.iter().filter(|p| p.atomic) {
            assert_eq!(p.fragments.len(), 1);
            let f = &p.fragments[0];
            let page = &doc.pages[f.page_index];
            assert!(f.y + f.height <= page.content_area.bottom() + 1e-6);
        }
    }

    #[test]
    fn oversized_tag_row_is_clipped_and_reported() {
        let tags: Vec<String> = (0..600).map(|i| format!("tag-number-{i}")).collect();
        let doc = engine().compose(&make_input(vec![Section::new(
            "Tags",
            vec![Block::paragraph("intro"), Block::TagRow { tags }],
        )]));
        let oversized: Vec<_> = doc
            .diagnostics
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::OversizedAtomicBlock { .. }))
            .collect();
        assert_eq!(oversized.len(), 1);
        assert_eq!(oversized[0].page_index, Some(1));
        let placement = doc.placement(0, 1).unwrap();
        assert!(placement.truncated);
        let page = &doc.pages[1];
        for p in page.content() {
            assert!(p.bounds().within(&page.content_area, 1e-6), "{p:?}");
        }
    }

    #[test]
    fn invalid_block_is_reported_but_rendered() {
        let doc = engine().compose(&make_input(vec![Section::new(
            "Scores",
            vec![Block::progress_bar("Docs", 4.0, 0.0)],
        )]));
        assert_eq!(doc.diagnostics.len(), 1);
        assert!(matches!(
            doc.diagnostics[0].kind,
            DiagnosticKind::InvalidBlock { .. }
        ));
        assert_eq!(doc.diagnostics[0].block, Some(0));
        assert!(doc.placement(0, 0).is_some());
    }

    #[test]
    fn empty_paragraph_is_skipped() {
        let doc = engine().compose(&make_input(vec![Section::new(
            "S",
            vec![Block::paragraph("   ")],
        )]));
        assert!(doc.placement(0, 0).is_none());
        assert_eq!(doc.diagnostics.len(), 1);
    }

    #[test]
    fn bad_config_falls_back_to_defaults() {
        let mut input = make_input(vec![Section::new("S", vec![Block::paragraph("x")])]);
        input.layout.body_font_size = -3.0;
        input.page.margin = Edges::uniform(500.0);
        let doc = engine().compose(&input);
        let config_issues = doc
            .diagnostics
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::InvalidConfig { .. }))
            .count();
        assert_eq!(config_issues, 2);
        assert_eq!(doc.page_width, 595.28);
    }

    #[test]
    fn title_goes_on_first_page() {
        let mut input = make_input(vec![Section::new("S", vec![Block::paragraph("x")])]);
        input.metadata.title = Some("Repository Report".to_string());
        let doc = engine().compose(&input);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].content()[0].text(), Some("Repository Report"));
    }

    #[test]
    fn first_major_section_shares_the_title_page() {
        let mut input = make_input(vec![
            Section::new("Summary", vec![Block::paragraph("body")]),
            Section::new("Details", vec![Block::paragraph("more")]),
        ]);
        input.metadata.title = Some("Report".to_string());
        let doc = engine().compose(&input);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.placement(0, 0).unwrap().pages(), vec![0]);
        assert_eq!(doc.placement(1, 0).unwrap().pages(), vec![1]);
    }

    #[test]
    fn section_that_draws_nothing_adds_no_page() {
        let doc = engine().layout(&make_input(vec![
            Section::new("A", vec![Block::paragraph("a")]),
            Section::new("", vec![Block::paragraph("  ")]),
        ]));
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.diagnostics.len(), 1);
    }

    #[test]
    fn empty_major_section_does_not_break_for_the_next_one() {
        let doc = engine().compose(&make_input(vec![
            Section::new("A", vec![Block::paragraph("a")]),
            Section::new("", vec![]),
            Section::minor("C", vec![Block::paragraph("c")]),
        ]));
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.placement(2, 0).unwrap().pages(), vec![0]);
    }

    #[test]
    fn composition_is_deterministic() {
        let input = make_input(vec![Section::new(
            "S",
            vec![Block::paragraph(&long_text(900)), Block::tag_row(&["a", "b"])],
        )]);
        let a = serde_json::to_string(&engine().layout(&input)).unwrap();
        let b = serde_json::to_string(&engine().layout(&input)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn json_snapshot_lists_pages_and_placements() {
        let input = make_input(vec![Section::new("S", vec![Block::paragraph("body")])]);
        let json = engine().layout(&input).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pages"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["placements"][0]["section"], 0);
    }
}
