//! # Text Measurement
//!
//! Pure functions that turn a string, a text style and a maximum width into
//! wrapped lines and heights. Nothing here touches layout state, so the flow
//! cursor can call these speculatively before committing a placement.

use crate::style::TextStyle;

/// The result of wrapping a string.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedText {
    /// The text of each line, words joined by single spaces.
    pub lines: Vec<String>,
    /// Height of a single line box in points.
    pub line_height: f64,
}

impl WrappedText {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn height(&self) -> f64 {
        height(self.lines.len(), self.line_height)
    }
}

/// Total height of `line_count` lines.
pub fn height(line_count: usize, line_height: f64) -> f64 {
    line_count as f64 * line_height
}

/// Greedy word wrap.
///
/// Words accumulate on the current line while `width(line + " " + word)`
/// stays within `max_width`. A word wider than `max_width` is placed alone
/// on its own line; words are never split. `\n` is a mandatory break, and a
/// blank input line becomes an empty output line. Leading and trailing blank
/// lines are dropped, so whitespace-only input produces no lines at all.
pub fn wrap(text: &str, style: &TextStyle, max_width: f64) -> WrappedText {
    let space_width = style.font.char_width(' ', style.size);
    let mut lines: Vec<String> = Vec::new();

    for segment in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in segment.split_whitespace() {
            let word_width = style.font.measure_string(word, style.size);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            let candidate = current_width + space_width + word_width;
            if candidate <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_width;
            }
        }

        // An empty segment still yields a (blank) line; trimmed below.
        lines.push(current);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let leading_blank = lines.iter().take_while(|l| l.is_empty()).count();
    lines.drain(..leading_blank);

    WrappedText {
        lines,
        line_height: style.line_box(),
    }
}

/// Width of a single line of text in points.
pub fn measure_width(text: &str, style: &TextStyle) -> f64 {
    style.font.measure_string(text, style.size)
}

const ELLIPSIS: &str = "...";

/// Shorten `text` so it fits on one line of `max_width`, appending `...`
/// when anything was cut. Returns an empty string when not even the
/// ellipsis fits.
pub fn truncate_to_width(text: &str, style: &TextStyle, max_width: f64) -> String {
    let text = text.trim();
    if measure_width(text, style) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = measure_width(ELLIPSIS, style);
    if ellipsis_width > max_width {
        return String::new();
    }

    let mut kept = String::new();
    let mut width = ellipsis_width;
    for ch in text.chars() {
        let w = style.font.char_width(ch, style.size);
        if width + w > max_width {
            break;
        }
        kept.push(ch);
        width += w;
    }

    let mut out = kept.trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardFont;
    use crate::style::Color;

    fn body() -> TextStyle {
        TextStyle::new(StandardFont::Helvetica, 10.0, 1.4, Color::BLACK)
    }

    #[test]
    fn test_single_line() {
        let wrapped = wrap("Hello World", &body(), 500.0);
        assert_eq!(wrapped.lines, vec!["Hello World"]);
        assert!((wrapped.line_height - 14.0).abs() < 1e-9);
        assert!((wrapped.height() - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_break_at_space() {
        let style = body();
        let width = measure_width("Hello World", &style) - 1.0;
        let wrapped = wrap("Hello World", &style, width);
        assert_eq!(wrapped.lines, vec!["Hello", "World"]);
    }

    #[test]
    fn test_just_enough_room_stays_on_one_line() {
        let style = body();
        let width = measure_width("Hello World", &style) + 0.001;
        let wrapped = wrap("Hello World", &style, width);
        assert_eq!(wrapped.line_count(), 1);
    }

    #[test]
    fn test_overlong_word_alone_on_line() {
        let style = body();
        let wrapped = wrap("a supercalifragilistic b", &style, 30.0);
        assert_eq!(wrapped.lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_explicit_newline() {
        let wrapped = wrap("Line one\nLine two", &body(), 500.0);
        assert_eq!(wrapped.lines, vec!["Line one", "Line two"]);
    }

    #[test]
    fn test_blank_line_kept_inside_text() {
        let wrapped = wrap("\nfirst\n\nsecond\n\n", &body(), 500.0);
        assert_eq!(wrapped.lines, vec!["first", "", "second"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(wrap("", &body(), 100.0).line_count(), 0);
        assert_eq!(wrap("   \n  ", &body(), 100.0).line_count(), 0);
    }

    #[test]
    fn test_collapses_runs_of_spaces() {
        let wrapped = wrap("alpha    beta\tgamma", &body(), 500.0);
        assert_eq!(wrapped.lines, vec!["alpha beta gamma"]);
    }

    #[test]
    fn test_lines_never_exceed_width_unless_single_word() {
        let style = body();
        let text = "The quick brown fox jumps over the lazy dog while the report \
                    generator keeps on emitting perfectly ordinary words";
        let wrapped = wrap(text, &style, 80.0);
        for line in &wrapped.lines {
            let w = measure_width(line, &style);
            assert!(w <= 80.0 + 1e-6 || !line.contains(' '), "{line:?} is {w}pt");
        }
    }

    #[test]
    fn test_truncate_fits_unchanged() {
        assert_eq!(truncate_to_width("Short", &body(), 200.0), "Short");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        let style = body();
        let out = truncate_to_width("Repository health overview for the quarter", &style, 80.0);
        assert!(out.ends_with("..."));
        assert!(measure_width(&out, &style) <= 80.0 + 1e-9);
    }

    #[test]
    fn test_truncate_too_narrow_for_ellipsis() {
        assert_eq!(truncate_to_width("Anything", &body(), 2.0), "");
    }
}
