//! # Quire CLI
//!
//! Usage:
//!   quire report.json -o report.pdf
//!   echo '{ ... }' | quire -o report.pdf
//!   quire report.json --edition brief --layout-json layout.json
//!   quire --example > report.json

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use env_logger::Env;

use quire::{QuireError, Rendered, ReportInput};

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "Lay out a structured report into paginated PDF", long_about = None)]
struct Cli {
    /// Report JSON (stdin if not specified)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE", default_value = "output.pdf")]
    output: PathBuf,

    /// Only include sections tagged with this edition
    #[arg(long, env = "QUIRE_EDITION")]
    edition: Option<String>,

    /// Write the Markdown rendering instead of PDF
    #[arg(long)]
    plain: bool,

    /// Also write the page layout (primitives, placements, diagnostics) as JSON
    #[arg(long, value_name = "FILE")]
    layout_json: Option<PathBuf>,

    /// Print an example report and exit
    #[arg(long)]
    example: bool,

    /// More logging (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if cli.example {
        print!("{}", example_report_json());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), QuireError> {
    let json = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut input: ReportInput = serde_json::from_str(&json)?;
    if let Some(edition) = &cli.edition {
        input = input.select_edition(edition);
    }
    if input.metadata.generated_at.is_none() {
        input.metadata.generated_at = Some(Utc::now());
    }

    if cli.plain {
        let markdown = quire::plain::to_markdown(&input);
        fs::write(&cli.output, &markdown)?;
        eprintln!("✓ Written {} bytes to {}", markdown.len(), cli.output.display());
        return Ok(());
    }

    let output = quire::render(&input);
    for diagnostic in output.diagnostics() {
        eprintln!("warning: {diagnostic}");
    }

    if let Some(path) = &cli.layout_json {
        fs::write(path, output.document.to_json()?)?;
    }

    match output.rendered {
        Rendered::Pdf(bytes) => {
            fs::write(&cli.output, &bytes)?;
            eprintln!(
                "✓ Written {} bytes ({} pages) to {}",
                bytes.len(),
                output.document.page_count(),
                cli.output.display()
            );
        }
        Rendered::Fallback { markdown, error } => {
            let path = fallback_path(&cli.output);
            fs::write(&path, &markdown)?;
            eprintln!("warning: {error}");
            eprintln!("✓ PDF unavailable, wrote Markdown to {}", path.display());
        }
    }
    Ok(())
}

/// `report.pdf` → `report.md`
fn fallback_path(output: &Path) -> PathBuf {
    output.with_extension("md")
}

fn example_report_json() -> &'static str {
    r##"{
  "metadata": {
    "title": "Repository Health Report: acme/widgets",
    "author": "Quire",
    "footerLabel": "Source: public repository API"
  },
  "page": { "size": "A4", "margin": 56.69 },
  "layout": { "bodyFontSize": 10, "lineHeight": 1.4, "blockGap": 8 },
  "sections": [
    {
      "title": "Executive Summary",
      "blocks": [
        { "type": "Paragraph", "text": "acme/widgets is an actively maintained library with a steady release cadence. Issue response times improved this quarter, while documentation coverage remains the weakest area." },
        { "type": "StatCard", "label": "Stars", "value": "12,480", "trend": { "direction": "Up", "text": "+8% QoQ" } },
        { "type": "StatCard", "label": "Open issues", "value": "214", "trend": { "direction": "Down", "text": "-31" }, "accentColor": "#16a34a" },
        { "type": "StatCard", "label": "Median first response", "value": "9h", "trend": { "direction": "Flat", "text": "unchanged" } }
      ]
    },
    {
      "title": "Health Scores",
      "blocks": [
        { "type": "ProgressBar", "label": "Overall health", "score": 78, "max": 100 },
        { "type": "ProgressBar", "label": "Documentation", "score": 41, "max": 100 },
        { "type": "ProgressBar", "label": "Test coverage", "score": 23, "max": 100 },
        { "type": "Divider" },
        { "type": "Heading", "text": "Topics", "level": 2 },
        { "type": "TagRow", "tags": ["rust", "pdf", "layout", "reporting", "cli", "typography", "serde", "open-source"] }
      ]
    },
    {
      "title": "Repository Facts",
      "major": false,
      "blocks": [
        { "type": "MetadataRow", "key": "License", "value": "MIT" },
        { "type": "MetadataRow", "key": "Default branch", "value": "main" },
        { "type": "MetadataRow", "key": "Primary language", "value": "Rust" }
      ]
    },
    {
      "title": "Maintainer Notes",
      "editions": ["full"],
      "blocks": [
        { "type": "Paragraph", "text": "This section only appears in the full edition. Run with --edition brief to leave it out." }
      ]
    }
  ]
}
"##
}
