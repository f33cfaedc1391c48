//! Truncation strategies
//!
//! A strategy picks the window of a long text to show around a mismatch,
//! preferring to cut at word boundaries.

use std::ops::Range;

/// Chars before the target that are always kept
const LEADING_CONTEXT: usize = 10;
/// Distance before the target where the start-boundary search window opens
const START_SEARCH_OFFSET: usize = 16;
/// Width of the boundary search windows
const SEARCH_WINDOW: usize = 11;
/// How far short of the default length a word boundary may cut
const BOUNDARY_SLACK: usize = 5;

/// Chooses the char range of `text` to display for a mismatch at `target_index`
pub trait TruncationStrategy: Send + Sync {
    fn truncation_range(&self, text: &str, target_index: usize) -> Range<usize>;
}

/// Keeps leading context before the mismatch and about `default_length` chars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardTruncationStrategy {
    pub default_length: usize,
}

impl StandardTruncationStrategy {
    pub fn new(default_length: usize) -> Self {
        Self { default_length }
    }
}

impl Default for StandardTruncationStrategy {
    fn default() -> Self {
        Self::new(crate::formatting::current().string_printing_length)
    }
}

impl TruncationStrategy for StandardTruncationStrategy {
    fn truncation_range(&self, text: &str, target_index: usize) -> Range<usize> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        if len <= self.default_length {
            return 0..len;
        }
        let target = target_index.min(len);

        let start = if target <= LEADING_CONTEXT {
            0
        } else {
            let window_start = target.saturating_sub(START_SEARCH_OFFSET);
            let window_end = (window_start + SEARCH_WINDOW).min(len);
            chars[window_start..window_end]
                .iter()
                .position(|c| *c == ' ')
                .map(|p| window_start + p + 1)
                .unwrap_or(target - LEADING_CONTEXT)
        };

        let remaining = len - start;
        let search_length = (self.default_length + SEARCH_WINDOW).min(remaining);
        let boundary = chars[start..start + search_length]
            .iter()
            .rposition(|c| *c == ' ')
            .filter(|p| *p >= self.default_length.saturating_sub(BOUNDARY_SLACK));
        let length = boundary.unwrap_or_else(|| self.default_length.min(remaining));

        start..start + length
    }
}

/// Applies the inner strategy to the reversed text, keeping trailing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvertedTruncationStrategy<S> {
    inner: S,
}

impl<S: TruncationStrategy> InvertedTruncationStrategy<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: TruncationStrategy> TruncationStrategy for InvertedTruncationStrategy<S> {
    fn truncation_range(&self, text: &str, target_index: usize) -> Range<usize> {
        let reversed: String = text.chars().rev().collect();
        let len = reversed.chars().count();
        let reversed_target = if target_index >= len {
            0
        } else {
            len - 1 - target_index
        };
        let range = self.inner.truncation_range(&reversed, reversed_target);
        let end = range.end.min(len);
        let start = range.start.min(end);
        (len - end)..(len - start)
    }
}
