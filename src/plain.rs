//! Markdown rendering of a report.
//!
//! The degraded output used when PDF encoding fails. It walks the same
//! section tree linearly, without measurement or pagination, so it can be
//! produced from the input alone and always succeeds.

use std::fmt::Write;

use crate::layout::block::{format_score, normalize, progress_ratio};
use crate::layout::footer::generated_label;
use crate::model::{Block, ColorBand, ReportInput, Section, TrendDirection};

/// Width of the text progress bar, in cells.
const BAR_CELLS: usize = 20;

/// Convert a report to Markdown.
pub fn to_markdown(input: &ReportInput) -> String {
    let mut output = String::new();
    let metadata = &input.metadata;

    if let Some(title) = metadata.title.as_deref().filter(|t| !t.trim().is_empty()) {
        let _ = writeln!(output, "# {}\n", title.trim());
    }
    let mut byline = Vec::new();
    if let Some(author) = &metadata.author {
        byline.push(author.clone());
    }
    if let Some(at) = &metadata.generated_at {
        byline.push(generated_label(at));
    }
    if !byline.is_empty() {
        let _ = writeln!(output, "_{}_\n", byline.join(" · "));
    }

    for section in &input.sections {
        render_section(&mut output, section);
    }

    if let Some(label) = &metadata.footer_label {
        let _ = writeln!(output, "---\n\n_{}_", label.trim());
    }

    output.trim().to_string() + "\n"
}

fn render_section(output: &mut String, section: &Section) {
    if !section.title.trim().is_empty() {
        let _ = writeln!(output, "## {}\n", section.title.trim());
    }
    for block in &section.blocks {
        let (block, _) = normalize(block);
        render_block(output, &block);
    }
}

fn render_block(output: &mut String, block: &Block) {
    match block {
        Block::Heading { text, level } => {
            if text.trim().is_empty() {
                return;
            }
            // Section titles use `##`, so block headings start one below.
            let hashes = "#".repeat((*level as usize + 2).min(6));
            let _ = writeln!(output, "{hashes} {}\n", text.trim());
        }

        Block::Paragraph { text } => {
            let text = text.trim();
            if !text.is_empty() {
                let _ = writeln!(output, "{text}\n");
            }
        }

        Block::StatCard {
            label,
            value,
            trend,
            ..
        } => {
            let _ = write!(output, "- **{}**: {}", label.trim(), value.trim());
            if let Some(trend) = trend {
                let arrow = match trend.direction {
                    TrendDirection::Up => "up",
                    TrendDirection::Down => "down",
                    TrendDirection::Flat => "flat",
                };
                let _ = write!(output, " ({arrow}");
                if !trend.text.trim().is_empty() {
                    let _ = write!(output, " {}", trend.text.trim());
                }
                output.push(')');
            }
            output.push_str("\n\n");
        }

        Block::ProgressBar {
            label,
            score,
            max,
            color_band,
        } => {
            let ratio = progress_ratio(*score, *max);
            let filled = (ratio.unwrap_or(0.0) * BAR_CELLS as f64).round() as usize;
            let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_CELLS - filled));
            let score_text = match ratio {
                Some(_) => format!("{} / {}", format_score(*score), format_score(*max)),
                None => "n/a".to_string(),
            };
            let band = color_band.unwrap_or_else(|| ColorBand::for_ratio(ratio.unwrap_or(0.0)));
            let _ = writeln!(
                output,
                "{}: `[{bar}]` {score_text} ({band:?})\n",
                label.trim()
            );
        }

        Block::TagRow { tags } => {
            if tags.is_empty() {
                return;
            }
            let line: Vec<String> = tags.iter().map(|t| format!("`{}`", t.trim())).collect();
            let _ = writeln!(output, "{}\n", line.join(" "));
        }

        Block::MetadataRow { key, value } => {
            let _ = writeln!(output, "**{}:** {}\n", key.trim(), value.trim());
        }

        Block::Divider => output.push_str("---\n\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, Trend};

    fn make_report(blocks: Vec<Block>) -> ReportInput {
        ReportInput {
            metadata: Metadata {
                title: Some("Repository Report".to_string()),
                footer_label: Some("Source: public API".to_string()),
                ..Default::default()
            },
            sections: vec![Section::new("Overview", blocks)],
            ..Default::default()
        }
    }

    #[test]
    fn renders_every_block_kind() {
        let md = to_markdown(&make_report(vec![
            Block::heading("Summary", 1),
            Block::paragraph("Plain words."),
            Block::StatCard {
                label: "Stars".to_string(),
                value: "1.2k".to_string(),
                trend: Some(Trend {
                    direction: TrendDirection::Up,
                    text: "+12%".to_string(),
                }),
                accent_color: None,
            },
            Block::progress_bar("Health", 50.0, 100.0),
            Block::tag_row(&["rust", "pdf"]),
            Block::metadata_row("License", "MIT"),
            Block::Divider,
        ]));

        assert!(md.starts_with("# Repository Report\n"));
        assert!(md.contains("## Overview\n"));
        assert!(md.contains("### Summary\n"));
        assert!(md.contains("Plain words.\n"));
        assert!(md.contains("- **Stars**: 1.2k (up +12%)"));
        assert!(md.contains("Health: `[##########----------]` 50 / 100 (Medium)"));
        assert!(md.contains("`rust` `pdf`"));
        assert!(md.contains("**License:** MIT"));
        assert!(md.contains("\n---\n"));
        assert!(md.trim_end().ends_with("_Source: public API_"));
    }

    #[test]
    fn invalid_progress_bar_renders_as_empty() {
        let md = to_markdown(&make_report(vec![Block::progress_bar("Docs", 3.0, 0.0)]));
        assert!(md.contains("Docs: `[--------------------]` n/a (Low)"));
    }

    #[test]
    fn keeps_text_the_pdf_fonts_cannot_encode() {
        let md = to_markdown(&make_report(vec![Block::paragraph("混合 text")]));
        assert!(md.contains("混合 text"));
    }
}
