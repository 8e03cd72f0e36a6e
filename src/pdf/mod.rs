//! # PDF Serializer
//!
//! Takes the finished pages from the layout engine and writes a valid PDF
//! file.
//!
//! This is a from-scratch PDF 1.7 writer. Only the two standard Type1 fonts
//! are used, so nothing is embedded and the whole subset we need is small:
//! fill and stroke paths, Bezier curves, and single-line text.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Every primitive is wrapped in its own `q ... Q` pair and sets its own
//! colors, so no graphics state survives from one primitive to the next.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::Write as _;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::{QuireError, Result};
use crate::font::StandardFont;
use crate::layout::{Document, Page};
use crate::render::Primitive;
use crate::style::{Color, Style, TextStyle};
use crate::text::measure_width;

/// Control point distance for approximating a quarter circle with a cubic.
const KAPPA: f64 = 0.5522847498;

pub struct PdfWriter;

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Indirect objects in id order. Id 0 is the free-list head and never
/// written.
struct ObjectTable {
    bodies: Vec<Vec<u8>>,
}

impl ObjectTable {
    fn new() -> Self {
        Self {
            bodies: vec![Vec::new()],
        }
    }

    /// Allocate an id whose body is filled in later with [`ObjectTable::set`].
    fn reserve(&mut self) -> usize {
        self.push(Vec::new())
    }

    fn push(&mut self, body: Vec<u8>) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    fn set(&mut self, id: usize, body: Vec<u8>) {
        self.bodies[id] = body;
    }

    fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Lay the objects out after the header, then the xref table and the
    /// trailer pointing at `catalog` and `info`.
    fn finish(self, catalog: usize, info: usize) -> Vec<u8> {
        let mut out = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n".to_vec();
        let mut offsets = Vec::with_capacity(self.bodies.len());

        for (id, body) in self.bodies.iter().enumerate().skip(1) {
            offsets.push(out.len());
            let _ = write!(out, "{id} 0 obj\n");
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_at = out.len();
        let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", self.bodies.len());
        for offset in offsets {
            let _ = write!(out, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            out,
            "trailer\n<< /Size {} /Root {catalog} 0 R /Info {info} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            self.bodies.len()
        );
        out
    }
}

/// A content stream object: FlateDecode-compressed operators.
fn stream_object(content: &str) -> Vec<u8> {
    let compressed = compress_to_vec_zlib(content.as_bytes(), 6);
    let mut body = format!(
        "<< /Length {} /Filter /FlateDecode >>\nstream\n",
        compressed.len()
    )
    .into_bytes();
    body.extend_from_slice(&compressed);
    body.extend_from_slice(b"\nendstream");
    body
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write a laid-out document to a PDF byte vector.
    ///
    /// Fails with [`QuireError::Encoding`] when a text run holds a character
    /// outside WinAnsiEncoding or a primitive has non-finite coordinates.
    pub fn write(&self, document: &Document) -> Result<Vec<u8>> {
        let mut table = ObjectTable::new();
        let catalog = table.reserve();
        let tree = table.reserve();

        let fonts = register_fonts(&mut table, &document.pages);
        let font_resources: Vec<String> = fonts
            .iter()
            .enumerate()
            .map(|(slot, (_, id))| format!("/F{slot} {id} 0 R"))
            .collect();
        let font_resources = font_resources.join(" ");

        let mut kids = Vec::with_capacity(document.pages.len());
        for page in &document.pages {
            let content = self.build_content_stream(page, &fonts)?;
            let contents = table.push(stream_object(&content));
            let page_dict = format!(
                "<< /Type /Page /Parent {tree} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {contents} 0 R /Resources << /Font << {font_resources} >> >> >>",
                page.width, page.height
            );
            kids.push(table.push(page_dict.into_bytes()));
        }

        table.set(
            catalog,
            format!("<< /Type /Catalog /Pages {tree} 0 R >>").into_bytes(),
        );
        let kid_refs: Vec<String> = kids.iter().map(|id| format!("{id} 0 R")).collect();
        table.set(
            tree,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kid_refs.join(" "),
                kids.len()
            )
            .into_bytes(),
        );
        let info = table.push(self.build_info_dict(document)?.into_bytes());

        log::debug!(
            "wrote {} page(s), {} PDF object(s)",
            kids.len(),
            table.len() - 1
        );
        Ok(table.finish(catalog, info))
    }

    fn build_info_dict(&self, document: &Document) -> Result<String> {
        let metadata = &document.metadata;
        let mut info = String::from("<< ");
        if let Some(title) = &metadata.title {
            let _ = write!(info, "/Title ({}) ", encode_text(title)?);
        }
        if let Some(author) = &metadata.author {
            let _ = write!(info, "/Author ({}) ", encode_text(author)?);
        }
        if let Some(at) = &metadata.generated_at {
            let _ = write!(info, "/CreationDate (D:{}Z) ", at.format("%Y%m%d%H%M%S"));
        }
        info.push_str("/Producer (Quire) /Creator (Quire) >>");
        Ok(info)
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(
        &self,
        page: &Page,
        fonts: &[(StandardFont, usize)],
    ) -> Result<String> {
        let mut stream = String::new();
        for primitive in page.primitives() {
            self.write_primitive(&mut stream, primitive, page.height, fonts)?;
        }
        Ok(stream)
    }

    /// Write a single primitive as PDF operators. Coordinates are flipped
    /// from top-left page space into PDF's bottom-left space.
    fn write_primitive(
        &self,
        stream: &mut String,
        primitive: &Primitive,
        page_height: f64,
        fonts: &[(StandardFont, usize)],
    ) -> Result<()> {
        let bounds = primitive.bounds();
        if !bounds.is_finite() {
            return Err(QuireError::Encoding(format!(
                "non-finite coordinates in {primitive:?}"
            )));
        }

        match primitive {
            Primitive::Rect {
                x,
                y,
                width,
                height,
                style,
            } => {
                let Some(op) = paint_operator(style) else {
                    return Ok(());
                };
                stream.push_str("q\n");
                write_style(stream, style);
                let _ = writeln!(
                    stream,
                    "{:.2} {:.2} {:.2} {:.2} re",
                    x,
                    page_height - y - height,
                    width,
                    height
                );
                let _ = write!(stream, "{op}\nQ\n");
            }

            Primitive::RoundedRect {
                x,
                y,
                width,
                height,
                style,
            } => {
                let Some(op) = paint_operator(style) else {
                    return Ok(());
                };
                stream.push_str("q\n");
                write_style(stream, style);
                write_rounded_rect(
                    stream,
                    *x,
                    page_height - y - height,
                    *width,
                    *height,
                    style.corner_radius,
                );
                let _ = write!(stream, "{op}\nQ\n");
            }

            Primitive::FilledBar {
                x,
                y,
                width,
                height,
                fraction,
                track,
                fill,
            } => {
                let pdf_y = page_height - y - height;
                let radius = height / 2.0;
                stream.push_str("q\n");
                write_fill(stream, track);
                write_rounded_rect(stream, *x, pdf_y, *width, *height, radius);
                stream.push_str("f\n");
                let filled = width * fraction.clamp(0.0, 1.0);
                if filled > 0.0 {
                    write_fill(stream, fill);
                    write_rounded_rect(stream, *x, pdf_y, filled, *height, radius);
                    stream.push_str("f\n");
                }
                stream.push_str("Q\n");
            }

            Primitive::Circle {
                cx,
                cy,
                radius,
                style,
            } => {
                let Some(op) = paint_operator(style) else {
                    return Ok(());
                };
                stream.push_str("q\n");
                write_style(stream, style);
                write_circle(stream, *cx, page_height - cy, *radius);
                let _ = write!(stream, "{op}\nQ\n");
            }

            Primitive::TextRun {
                x, y, text, style, ..
            } => {
                let baseline = y + baseline_offset(style);
                write_text(stream, *x, page_height - baseline, text, style, fonts)?;
            }

            Primitive::Chip {
                x,
                y,
                width,
                height,
                text,
                fill,
                text_style,
            } => {
                stream.push_str("q\n");
                write_fill(stream, fill);
                write_rounded_rect(
                    stream,
                    *x,
                    page_height - y - height,
                    *width,
                    *height,
                    height / 2.0,
                );
                stream.push_str("f\nQ\n");

                let text_w = measure_width(text, text_style);
                let tx = x + (width - text_w) / 2.0;
                // Cap height of Helvetica is about 0.7em; center it.
                let baseline = y + height / 2.0 + text_style.size * 0.35;
                write_text(stream, tx, page_height - baseline, text, text_style, fonts)?;
            }
        }
        Ok(())
    }
}

/// Add one font object per standard font used on any page, in a stable
/// order. Resource name `/F{n}` refers to the n-th entry.
fn register_fonts(table: &mut ObjectTable, pages: &[Page]) -> Vec<(StandardFont, usize)> {
    let mut used: BTreeSet<StandardFont> = pages
        .iter()
        .flat_map(|p| p.primitives())
        .filter_map(|p| match p {
            Primitive::TextRun { style, .. } => Some(style.font),
            Primitive::Chip { text_style, .. } => Some(text_style.font),
            _ => None,
        })
        .collect();
    if used.is_empty() {
        used.insert(StandardFont::Helvetica);
    }

    used.into_iter()
        .map(|font| {
            let dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            (font, table.push(dict.into_bytes()))
        })
        .collect()
}

/// Fill and/or stroke operator for a style, or `None` when it paints nothing.
fn paint_operator(style: &Style) -> Option<&'static str> {
    let fill = style.fill.is_some_and(|c| c.a > 0.0);
    let stroke = style.stroke.is_some_and(|c| c.a > 0.0) && style.stroke_width > 0.0;
    match (fill, stroke) {
        (true, true) => Some("B"),
        (true, false) => Some("f"),
        (false, true) => Some("S"),
        (false, false) => None,
    }
}

fn write_fill(stream: &mut String, color: &Color) {
    let _ = writeln!(stream, "{:.3} {:.3} {:.3} rg", color.r, color.g, color.b);
}

fn write_style(stream: &mut String, style: &Style) {
    if let Some(fill) = &style.fill {
        write_fill(stream, fill);
    }
    if let Some(stroke) = &style.stroke {
        let _ = writeln!(
            stream,
            "{:.3} {:.3} {:.3} RG\n{:.2} w",
            stroke.r, stroke.g, stroke.b, style.stroke_width
        );
    }
}

/// Distance from the top of a line box to the text baseline.
fn baseline_offset(style: &TextStyle) -> f64 {
    (style.line_box() - style.size) / 2.0 + style.size * 0.8
}

fn write_text(
    stream: &mut String,
    x: f64,
    pdf_y: f64,
    text: &str,
    style: &TextStyle,
    fonts: &[(StandardFont, usize)],
) -> Result<()> {
    let encoded = encode_text(text)?;
    let font_index = fonts
        .iter()
        .position(|(f, _)| *f == style.font)
        .unwrap_or(0);
    let c = style.color;
    let _ = write!(
        stream,
        "q\nBT\n/F{} {:.1} Tf\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} Td\n({}) Tj\nET\nQ\n",
        font_index, style.size, c.r, c.g, c.b, x, pdf_y, encoded
    );
    Ok(())
}

/// Path for a rectangle with uniform corner radius, in PDF coordinates
/// (`y` is the bottom edge).
fn write_rounded_rect(stream: &mut String, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    if r <= 0.0 {
        let _ = writeln!(stream, "{:.2} {:.2} {:.2} {:.2} re", x, y, w, h);
        return;
    }
    let k = KAPPA * r;

    let _ = writeln!(stream, "{:.2} {:.2} m", x + r, y);
    let _ = writeln!(stream, "{:.2} {:.2} l", x + w - r, y);
    let _ = writeln!(
        stream,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        x + w - r + k,
        y,
        x + w,
        y + r - k,
        x + w,
        y + r
    );
    let _ = writeln!(stream, "{:.2} {:.2} l", x + w, y + h - r);
    let _ = writeln!(
        stream,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        x + w,
        y + h - r + k,
        x + w - r + k,
        y + h,
        x + w - r,
        y + h
    );
    let _ = writeln!(stream, "{:.2} {:.2} l", x + r, y + h);
    let _ = writeln!(
        stream,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        x + r - k,
        y + h,
        x,
        y + h - r + k,
        x,
        y + h - r
    );
    let _ = writeln!(stream, "{:.2} {:.2} l", x, y + r);
    let _ = writeln!(
        stream,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
        x,
        y + r - k,
        x + r - k,
        y,
        x + r,
        y
    );
    stream.push_str("h\n");
}

/// Four-segment Bezier circle around (`cx`, `cy`) in PDF coordinates.
fn write_circle(stream: &mut String, cx: f64, cy: f64, r: f64) {
    let k = KAPPA * r;
    let _ = writeln!(stream, "{:.2} {:.2} m", cx + r, cy);
    let quadrants = [
        (cx + r, cy + k, cx + k, cy + r, cx, cy + r),
        (cx - k, cy + r, cx - r, cy + k, cx - r, cy),
        (cx - r, cy - k, cx - k, cy - r, cx, cy - r),
        (cx + k, cy - r, cx + r, cy - k, cx + r, cy),
    ];
    for (x1, y1, x2, y2, x3, y3) in quadrants {
        let _ = writeln!(
            stream,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c",
            x1, y1, x2, y2, x3, y3
        );
    }
    stream.push_str("h\n");
}

/// Encode text as the body of a PDF literal string in WinAnsiEncoding.
/// Bytes outside printable ASCII are written as octal escapes so the
/// content stream stays ASCII. Control characters are dropped; they take no
/// width during measurement either.
fn encode_text(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars().filter(|c| !c.is_control()) {
        let byte = unicode_to_winansi(ch).ok_or_else(|| {
            QuireError::Encoding(format!(
                "character {ch:?} (U+{:04X}) is not available in the standard PDF fonts",
                ch as u32
            ))
        })?;
        match byte {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{:03o}", byte);
            }
        }
    }
    Ok(out)
}

/// Map a Unicode codepoint to a WinAnsiEncoding byte value.
///
/// WinAnsiEncoding is based on Windows-1252: Latin-1 maps directly, and a
/// few typographic characters live in 0x80-0x9F.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82), // Single low-9 quotation mark
        0x0192 => Some(0x83), // Latin small letter f with hook
        0x201E => Some(0x84), // Double low-9 quotation mark
        0x2026 => Some(0x85), // Horizontal ellipsis
        0x2020 => Some(0x86), // Dagger
        0x2021 => Some(0x87), // Double dagger
        0x02C6 => Some(0x88), // Modifier letter circumflex accent
        0x2030 => Some(0x89), // Per mille sign
        0x0160 => Some(0x8A), // Latin capital letter S with caron
        0x2039 => Some(0x8B), // Single left-pointing angle quotation
        0x0152 => Some(0x8C), // Latin capital ligature OE
        0x017D => Some(0x8E), // Latin capital letter Z with caron
        0x2018 => Some(0x91), // Left single quotation mark
        0x2019 => Some(0x92), // Right single quotation mark
        0x201C => Some(0x93), // Left double quotation mark
        0x201D => Some(0x94), // Right double quotation mark
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97), // Em dash
        0x02DC => Some(0x98), // Small tilde
        0x2122 => Some(0x99), // Trade mark sign
        0x0161 => Some(0x9A), // Latin small letter s with caron
        0x203A => Some(0x9B), // Single right-pointing angle quotation
        0x0153 => Some(0x9C), // Latin small ligature oe
        0x017E => Some(0x9E), // Latin small letter z with caron
        0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;
    use crate::model::{Block, ReportInput, Section};
    use chrono::{TimeZone, Utc};

    fn make_document(blocks: Vec<Block>) -> Document {
        let input = ReportInput {
            sections: vec![Section::new("Overview", blocks)],
            ..Default::default()
        };
        LayoutEngine::new().layout(&input)
    }

    fn pdf_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_encode_escapes_delimiters() {
        assert_eq!(encode_text("Hello (World)").unwrap(), "Hello \\(World\\)");
        assert_eq!(encode_text("back\\slash").unwrap(), "back\\\\slash");
    }

    #[test]
    fn test_encode_latin1_as_octal() {
        assert_eq!(encode_text("café").unwrap(), "caf\\351");
        assert_eq!(encode_text("\u{2014}").unwrap(), "\\227");
    }

    #[test]
    fn test_encode_rejects_cjk() {
        let err = encode_text("中文").unwrap_err();
        assert!(matches!(err, QuireError::Encoding(_)));
    }

    #[test]
    fn test_empty_document_produces_valid_pdf() {
        let doc = LayoutEngine::new().layout(&ReportInput::default());
        let bytes = doc.to_bytes().unwrap();

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
        assert!(bytes.windows(4).any(|w| w == b"xref"));
        assert!(bytes.windows(7).any(|w| w == b"trailer"));
    }

    #[test]
    fn test_one_page_object_per_page() {
        let input = ReportInput {
            sections: vec![
                Section::new("A", vec![Block::paragraph("a")]),
                Section::new("B", vec![Block::paragraph("b")]),
            ],
            ..Default::default()
        };
        let doc = LayoutEngine::new().layout(&input);
        let text = pdf_text(&doc.to_bytes().unwrap());
        assert!(text.contains("/Count 2"));
        assert_eq!(text.matches("/Type /Page ").count(), 2);
    }

    #[test]
    fn test_metadata_in_pdf() {
        let mut doc = make_document(vec![Block::paragraph("body")]);
        doc.metadata.title = Some("Test Report".to_string());
        doc.metadata.author = Some("Quire".to_string());
        doc.metadata.generated_at = Some(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap());
        let text = pdf_text(&doc.to_bytes().unwrap());

        assert!(text.contains("/Title (Test Report)"));
        assert!(text.contains("/Author (Quire)"));
        assert!(text.contains("/CreationDate (D:20240506070809Z)"));
    }

    #[test]
    fn test_bold_font_registered_separately() {
        // Section titles are bold, paragraphs regular.
        let doc = make_document(vec![Block::paragraph("regular text")]);
        let text = pdf_text(&doc.to_bytes().unwrap());
        assert!(text.contains("/BaseFont /Helvetica "));
        assert!(text.contains("/BaseFont /Helvetica-Bold "));
    }

    #[test]
    fn test_unencodable_text_fails() {
        let doc = make_document(vec![Block::paragraph("Mixed 中文 text")]);
        assert!(matches!(doc.to_bytes(), Err(QuireError::Encoding(_))));
    }

    #[test]
    fn test_non_finite_coordinates_fail() {
        let mut out = String::new();
        let prim = Primitive::Rect {
            x: f64::NAN,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            style: Style::filled(Color::BLACK),
        };
        let result = PdfWriter::new().write_primitive(&mut out, &prim, 100.0, &[]);
        assert!(matches!(result, Err(QuireError::Encoding(_))));
    }

    #[test]
    fn test_paint_operator() {
        assert_eq!(paint_operator(&Style::filled(Color::BLACK)), Some("f"));
        assert_eq!(paint_operator(&Style::stroked(Color::BLACK, 1.0)), Some("S"));
        assert_eq!(
            paint_operator(&Style::filled(Color::WHITE).with_stroke(Color::BLACK, 1.0)),
            Some("B")
        );
        assert_eq!(paint_operator(&Style::stroked(Color::BLACK, 0.0)), None);
    }
}
