//! Measurer and wrapper: greedy word wrap against the static metric table.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::metrics;
use crate::layout::style::StyleRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedLine {
    pub text: String,
    pub style: StyleRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedBlock {
    pub lines: Vec<WrappedLine>,
    pub line_height: f32,
}

impl WrappedBlock {
    /// Height of the wrapped lines alone; block spacing is the flow engine's concern.
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Wraps `text` into lines no wider than `max_width` millimetres.
///
/// Tokens are whitespace-delimited and never split: a token wider than
/// `max_width` sits alone on its own line. Empty text produces no lines.
pub fn wrap(text: &str, style: &StyleRef, max_width: f32) -> WrappedBlock {
    let lines = wrap_text(text, style, max_width)
        .into_iter()
        .map(|text| WrappedLine {
            text,
            style: *style,
        })
        .collect();

    WrappedBlock {
        lines,
        line_height: style.line_pitch,
    }
}

/// Same greedy wrap as [`wrap`], returning bare strings. Used for table cells.
pub(crate) fn wrap_text(text: &str, style: &StyleRef, max_width: f32) -> Vec<String> {
    let table = metrics();
    let space_w = table.space_mm(style);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = table.measure_mm(word, style);

        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_w;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::style::StyleTable;

    fn body() -> StyleRef {
        StyleTable::default().paragraph()
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        let wrapped = wrap("", &body(), 180.0);
        assert_eq!(wrapped.line_count(), 0);
        assert_eq!(wrapped.height(), 0.0);
        assert_eq!(wrap("   \n\t", &body(), 180.0).line_count(), 0);
    }

    #[test]
    fn test_short_text_is_one_line() {
        let wrapped = wrap("Hello world", &body(), 180.0);
        assert_eq!(wrapped.line_count(), 1);
        assert_eq!(wrapped.lines[0].text, "Hello world");
        assert_eq!(wrapped.line_height, 5.5);
    }

    #[test]
    fn test_every_line_fits_except_forced_tokens() {
        let style = body();
        let text = "The quarterly report covers revenue growth, churn, and hiring plans \
                    across every regional office, with detailed commentary on each metric."
            .repeat(4);
        let max = 60.0;
        let wrapped = wrap(&text, &style, max);
        assert!(wrapped.line_count() > 1);
        for line in &wrapped.lines {
            let w = metrics().measure_mm(&line.text, &style);
            assert!(
                w <= max || !line.text.contains(' '),
                "line '{}' is {w}mm wide, limit {max}",
                line.text
            );
        }
    }

    #[test]
    fn test_wrap_preserves_all_words_in_order() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let wrapped = wrap(text, &body(), 30.0);
        let rejoined: Vec<&str> = wrapped
            .lines
            .iter()
            .flat_map(|l| l.text.split(' '))
            .collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_oversized_token_sits_alone() {
        let long = "x".repeat(400);
        let text = format!("before {long} after");
        let wrapped = wrap(&text, &body(), 50.0);
        assert_eq!(wrapped.line_count(), 3);
        assert_eq!(wrapped.lines[0].text, "before");
        assert_eq!(wrapped.lines[1].text, long);
        assert_eq!(wrapped.lines[2].text, "after");
    }

    #[test]
    fn test_wrap_is_deterministic() {
        let text = "Deterministic wrapping means identical pagination on every call. ".repeat(10);
        let a = wrap(&text, &body(), 120.0);
        let b = wrap(&text, &body(), 120.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_heading_uses_heading_pitch() {
        let heading = StyleTable::default().heading(1);
        let wrapped = wrap("Overview", &heading, 180.0);
        assert_eq!(wrapped.line_height, 7.0);
        assert_eq!(wrapped.lines[0].style, heading);
    }
}
