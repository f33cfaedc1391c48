//! Aligned `↓ (actual)` / `↑ (expected)` excerpts

use std::fmt;
use std::sync::Arc;

use super::span::MismatchSpan;
use super::truncation::{StandardTruncationStrategy, TruncationStrategy};

const ELLIPSIS: &str = "…";
const MARGIN: &str = "  ";

/// Describes where the mismatch is, given the original subject and index
pub type IndexFormatter = Arc<dyn Fn(&str, usize) -> String + Send + Sync>;

/// Options for `render_mismatch`
#[derive(Clone)]
pub struct RenderOptions {
    /// Pad the shorter line on the left so both lines end in the same column
    pub right_align: bool,
    /// Replaces the default `at index I` location phrase
    pub index_formatter: Option<IndexFormatter>,
    pub truncation: Arc<dyn TruncationStrategy>,
    /// Leading phrase of the header, e.g. `Expected name to be the same string`
    pub expectation_description: String,
}

impl RenderOptions {
    /// Left-aligned rendering with the standard truncation strategy
    pub fn new(expectation_description: impl Into<String>) -> Self {
        Self {
            right_align: false,
            index_formatter: None,
            truncation: Arc::new(StandardTruncationStrategy::default()),
            expectation_description: expectation_description.into(),
        }
    }

    pub fn with_right_align(mut self) -> Self {
        self.right_align = true;
        self
    }

    pub fn with_truncation(mut self, strategy: impl TruncationStrategy + 'static) -> Self {
        self.truncation = Arc::new(strategy);
        self
    }

    pub fn with_index_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str, usize) -> String + Send + Sync + 'static,
    {
        self.index_formatter = Some(Arc::new(formatter));
        self
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("right_align", &self.right_align)
            .field("custom_index_formatter", &self.index_formatter.is_some())
            .field("expectation_description", &self.expectation_description)
            .finish()
    }
}

/// Render the header and aligned excerpt for two differing strings
///
/// The indices are char indices of the first divergence in each string; they
/// may differ, for example when the divergence is anchored to the end.
pub fn render_mismatch(
    subject: &str,
    expectation: &str,
    subject_index: usize,
    expectation_index: usize,
    options: &RenderOptions,
) -> String {
    render_spans(
        MismatchSpan::new(subject, subject_index),
        MismatchSpan::new(expectation, expectation_index),
        options,
    )
}

/// Render two prepared spans; the header location is taken from `actual`
pub(crate) fn render_spans(
    mut actual: MismatchSpan,
    mut expected: MismatchSpan,
    options: &RenderOptions,
) -> String {
    let subject = actual.original().to_string();
    let subject_index = actual.index();

    // 1. truncate each side around its own mismatch
    actual.truncate(options.truncation.truncation_range(&subject, subject_index));
    expected.truncate(
        options
            .truncation
            .truncation_range(expected.original(), expected.index()),
    );

    // 2. escape line breaks, 3. quote with ellipses where truncated
    for span in [&mut actual, &mut expected] {
        span.escape_new_lines();
        decorate(span);
    }

    // 4. right alignment pads outside the quotes
    if options.right_align {
        let (a, e) = (actual.len(), expected.len());
        if a < e {
            actual.prepend(&" ".repeat(e - a));
        } else if e < a {
            expected.prepend(&" ".repeat(a - e));
        }
    }

    // 5. assemble with both markers over the larger mismatch column
    let location = match &options.index_formatter {
        Some(formatter) => formatter(&subject, subject_index),
        None => describe_location(&subject, subject_index),
    };
    let marker_padding = " ".repeat(MARGIN.len() + actual.index().max(expected.index()));

    format!(
        "{description}, but they differ {location}:\n\
         {pad}↓ (actual)\n\
         {margin}{actual}\n\
         {margin}{expected}\n\
         {pad}↑ (expected).",
        description = options.expectation_description,
        location = location,
        pad = marker_padding,
        margin = MARGIN,
        actual = actual.text(),
        expected = expected.text(),
    )
}

fn decorate(span: &mut MismatchSpan) {
    let prefix = if span.truncated_at_start() {
        format!("\"{}", ELLIPSIS)
    } else {
        "\"".to_string()
    };
    let suffix = if span.truncated_at_end() {
        format!("{}\"", ELLIPSIS)
    } else {
        "\"".to_string()
    };
    span.prepend(&prefix);
    span.append(&suffix);
}

/// `at index I`, or line and column for a multi-line subject
pub fn describe_location(subject: &str, index: usize) -> String {
    if !subject.contains('\n') {
        return format!("at index {}", index);
    }
    let mut line = 1;
    let mut line_start = 0;
    for (position, c) in subject.chars().enumerate().take(index) {
        if c == '\n' {
            line += 1;
            line_start = position + 1;
        }
    }
    format!(
        "on line {} and column {} (index {})",
        line,
        index.saturating_sub(line_start) + 1,
        index
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_strings_render_in_full() {
        let rendered = render_mismatch(
            "abc",
            "abd",
            2,
            2,
            &RenderOptions::new("Expected text to be the same string"),
        );
        let expected = "Expected text to be the same string, but they differ at index 2:\n     ↓ (actual)\n  \"abc\"\n  \"abd\"\n     ↑ (expected).";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_multiline_subject_reports_line_and_column() {
        assert_eq!(describe_location("ab\ncd", 4), "on line 2 and column 2 (index 4)");
        assert_eq!(describe_location("ab\ncd", 1), "on line 1 and column 2 (index 1)");
        assert_eq!(describe_location("abcd", 3), "at index 3");
    }

    #[test]
    fn test_custom_index_formatter() {
        let options = RenderOptions::new("Expected x to match")
            .with_index_formatter(|_, index| format!("near position {}", index));
        let rendered = render_mismatch("a", "b", 0, 0, &options);
        assert!(rendered.starts_with("Expected x to match, but they differ near position 0:"));
    }

    #[test]
    fn test_escaped_newline_keeps_markers_aligned() {
        let rendered = render_mismatch(
            "a\nb",
            "a\nc",
            2,
            2,
            &RenderOptions::new("Expected text to be the same string"),
        );
        let lines: Vec<&str> = rendered.lines().collect();
        let column = lines[1].chars().position(|c| c == '↓').unwrap();
        assert_eq!(lines[2].chars().nth(column), Some('b'));
        assert_eq!(lines[3].chars().nth(column), Some('c'));
    }

    #[test]
    fn test_right_alignment_pads_shorter_line() {
        let options = RenderOptions::new("Expected s to end with the suffix").with_right_align();
        let rendered = render_mismatch("xbc", "abc", 0, 0, &options);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "  \"xbc\"");
        assert_eq!(lines[3], "  \"abc\"");

        let rendered = render_mismatch("bc", "abc", 0, 0, &options);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2].chars().count(), lines[3].chars().count());
        assert!(lines[2].ends_with("\"bc\""));
    }
}
