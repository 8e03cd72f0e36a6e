//! # Quire
//!
//! A paginated report layout engine.
//!
//! Quire takes a tree of structured report content (headings, paragraphs,
//! stat cards, score bars, tag lists, key/value rows) and flows it into a
//! sequence of fixed-size pages. Every block is measured before it is
//! placed, so page breaks happen exactly at block boundaries (or between
//! lines of a paragraph) and nothing is drawn past a page's usable area.
//! Once the page count is known, every page is stamped with a
//! "Page i of N" footer.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    Sections, blocks, page and metric config
//!       ↓
//!   [layout]   Measure, place with the flow cursor, paint primitives
//!       ↓
//!   [footer]   Stamp "Page i of N" once the page count is final
//!       ↓
//!   [pdf]      Serialize to PDF bytes
//!       ↘
//!   [plain]    Markdown fallback when PDF encoding fails
//! ```

pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod plain;
pub mod render;
pub mod style;
pub mod text;

pub use error::{QuireError, Result};
pub use layout::{Diagnostic, DiagnosticKind, Document, LayoutEngine};
pub use model::{Block, ReportInput, Section};

/// The bytes produced for a report.
#[derive(Debug)]
pub enum Rendered {
    Pdf(Vec<u8>),
    /// PDF encoding failed; the report was rendered as Markdown instead.
    Fallback {
        markdown: String,
        error: QuireError,
    },
}

/// A rendered report together with the layout it came from.
#[derive(Debug)]
pub struct RenderOutput {
    pub document: Document,
    pub rendered: Rendered,
}

impl RenderOutput {
    pub fn page_count(&self) -> usize {
        self.document.page_count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.document.diagnostics
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.rendered, Rendered::Fallback { .. })
    }
}

/// Lay out a report into finished pages, footers included.
pub fn layout(input: &ReportInput) -> Document {
    LayoutEngine::new().layout(input)
}

/// Render a report to PDF bytes.
///
/// This is the primary entry point. Layout never fails; if PDF encoding
/// does, the report is rendered as Markdown from the same input and the
/// encoding error is returned alongside it.
pub fn render(input: &ReportInput) -> RenderOutput {
    let document = layout(input);
    let rendered = match document.to_bytes() {
        Ok(bytes) => Rendered::Pdf(bytes),
        Err(error) => {
            log::warn!("{error}; falling back to Markdown");
            Rendered::Fallback {
                markdown: plain::to_markdown(input),
                error,
            }
        }
    };
    RenderOutput { document, rendered }
}

/// Render a report described as JSON.
pub fn render_json(json: &str) -> Result<RenderOutput> {
    let input: ReportInput = serde_json::from_str(json)?;
    Ok(render(&input))
}
