//! String assertions that report through the mismatch renderer

use super::renderer::{render_mismatch, render_spans, RenderOptions};
use super::span::MismatchSpan;
use super::truncation::{InvertedTruncationStrategy, StandardTruncationStrategy};
use crate::errors::{AffirmError, Result};
use crate::formatting;

/// Char index of the first difference, or the shorter length for a prefix
pub fn first_mismatch_index(subject: &str, expectation: &str) -> usize {
    first_mismatch_index_by(subject, expectation, |a, b| a == b)
}

pub(crate) fn first_mismatch_index_by<F>(subject: &str, expectation: &str, same: F) -> usize
where
    F: Fn(char, char) -> bool,
{
    subject
        .chars()
        .zip(expectation.chars())
        .position(|(a, b)| !same(a, b))
        .unwrap_or_else(|| subject.chars().count().min(expectation.chars().count()))
}

/// Assert that `subject` equals `expectation`
///
/// # Errors
///
/// Returns `AssertionFailed` with a rendered excerpt around the first
/// difference.
pub fn assert_same_string(subject: &str, expectation: &str, subject_name: &str) -> Result<()> {
    if subject == expectation {
        return Ok(());
    }
    let index = first_mismatch_index(subject, expectation);
    let options = RenderOptions::new(format!(
        "Expected {} to be the same string",
        subject_name
    ));
    Err(failure(render_mismatch(
        subject,
        expectation,
        index,
        index,
        &options,
    )))
}

/// Assert that `subject` ends with `suffix`
///
/// The excerpt keeps trailing context and is right-aligned so both lines
/// end in the same column.
///
/// # Errors
///
/// Returns `AssertionFailed` with a rendered excerpt around the last
/// differing character.
pub fn assert_ends_with(subject: &str, suffix: &str, subject_name: &str) -> Result<()> {
    if subject.ends_with(suffix) {
        return Ok(());
    }
    let subject_len = subject.chars().count();
    let suffix_len = suffix.chars().count();
    let shared = subject
        .chars()
        .rev()
        .zip(suffix.chars().rev())
        .take_while(|(a, b)| a == b)
        .count();
    // a subject that is itself a tail of the suffix diverges before its start
    let actual = match subject_len.checked_sub(shared + 1) {
        Some(index) => MismatchSpan::new(subject, index),
        None => MismatchSpan::before_start(subject),
    };
    let expected = MismatchSpan::new(suffix, suffix_len.saturating_sub(shared + 1));

    let length = formatting::current().string_printing_length;
    let options = RenderOptions::new(format!(
        "Expected {} to end with the expected suffix",
        subject_name
    ))
    .with_right_align()
    .with_truncation(InvertedTruncationStrategy::new(
        StandardTruncationStrategy::new(length),
    ));
    Err(failure(render_spans(actual, expected, &options)))
}

fn failure(message: String) -> AffirmError {
    AffirmError::AssertionFailed {
        message,
        failure_count: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(result: Result<()>) -> String {
        match result {
            Err(AffirmError::AssertionFailed { message, .. }) => message,
            other => panic!("expected a failure, got {:?}", other),
        }
    }

    #[test]
    fn test_first_mismatch_index() {
        assert_eq!(first_mismatch_index("abc", "abd"), 2);
        assert_eq!(first_mismatch_index("ab", "abc"), 2);
        assert_eq!(first_mismatch_index("", "x"), 0);
        assert_eq!(first_mismatch_index("héllo", "hèllo"), 1);
    }

    #[test]
    fn test_same_string_passes() {
        assert!(assert_same_string("same", "same", "text").is_ok());
    }

    #[test]
    fn test_same_string_failure_points_at_difference() {
        let message = message_of(assert_same_string("01", "02", "Id"));
        assert!(message.starts_with("Expected Id to be the same string, but they differ at index 1:"));
        assert!(message.contains("\"01\""));
        assert!(message.contains("\"02\""));
    }

    #[test]
    fn test_ends_with_aligns_to_the_right() {
        assert!(assert_ends_with("file.txt", ".txt", "name").is_ok());

        let message = message_of(assert_ends_with("report.csv", "t.txt", "name"));
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines[2], "  \"report.csv\"");
        assert_eq!(lines[3], "       \"t.txt\"");
        let column = lines[1].chars().position(|c| c == '↓').unwrap();
        assert_eq!(lines[2].chars().nth(column), Some('v'));
        assert_eq!(lines[3].chars().nth(column), Some('t'));
    }

    #[test]
    fn test_ends_with_marks_text_missing_before_the_subject() {
        let message = message_of(assert_ends_with("txt", "a.txt", "name"));
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines[2], "    \"txt\"");
        assert_eq!(lines[3], "  \"a.txt\"");
        let column = lines[1].chars().position(|c| c == '↓').unwrap();
        assert_eq!(lines[4].chars().position(|c| c == '↑'), Some(column));
        assert_eq!(lines[2].chars().nth(column), Some('"'));
        assert_eq!(lines[3].chars().nth(column), Some('.'));
    }
}
