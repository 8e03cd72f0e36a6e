//! Structured error types for the Quire engine.
//!
//! Layout itself never fails: content defects become diagnostics on the
//! document. What remains are the real error sources: reading and parsing
//! the input, and encoding the laid-out pages to PDF.

use thiserror::Error;

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum QuireError {
    /// JSON input failed to parse as a report.
    #[error("Failed to parse report: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A page could not be encoded, e.g. text outside WinAnsiEncoding or a
    /// non-finite coordinate. Callers fall back to the plain-text rendering.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The laid-out document could not be written as a JSON snapshot.
    #[error("Failed to write layout snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for QuireError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the report schema. Check block \"type\" tags and field types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        QuireError::Parse { source: e, hint }
    }
}

pub type Result<T> = std::result::Result<T, QuireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_carry_a_hint() {
        let err: QuireError = serde_json::from_str::<serde_json::Value>("{ \"a\": 1, }")
            .unwrap_err()
            .into();
        let text = err.to_string();
        assert!(text.starts_with("Failed to parse report"));
        assert!(text.contains("trailing commas"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn schema_errors_mention_the_schema() {
        let err: QuireError = serde_json::from_str::<crate::model::ReportInput>(
            r#"{ "sections": [{ "blocks": [{ "type": "Chart" }] }] }"#,
        )
        .unwrap_err()
        .into();
        assert!(err.to_string().contains("report schema"));
    }

    #[test]
    fn encoding_error_message() {
        let err = QuireError::Encoding("character U+4E2D".to_string());
        assert_eq!(err.to_string(), "Encoding error: character U+4E2D");
    }

    #[test]
    fn snapshot_errors_are_not_parse_errors() {
        // Maps with non-string keys cannot be written as JSON.
        let keyed = std::collections::BTreeMap::from([((1u8, 2u8), 3u8)]);
        let source = serde_json::to_string(&keyed).unwrap_err();
        let err = QuireError::Snapshot(source);
        let text = err.to_string();
        assert!(text.starts_with("Failed to write layout snapshot"));
        assert!(!text.contains("Hint"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
