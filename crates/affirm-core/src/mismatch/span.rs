//! Mismatch span: a text excerpt that tracks where the divergence is
//!
//! All indices are `char` indices. Every transformation keeps `index` on the
//! same logical character it pointed at before.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchSpan {
    original: String,
    text: Vec<char>,
    index: usize,
    truncated_at_start: bool,
    truncated_at_end: bool,
    before_start: bool,
}

impl MismatchSpan {
    /// A span over the whole of `text`; `index` is clamped to its length
    pub fn new(text: &str, index: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let index = index.min(chars.len());
        Self {
            original: text.to_string(),
            text: chars,
            index,
            truncated_at_start: false,
            truncated_at_end: false,
            before_start: false,
        }
    }

    /// A span whose divergence lies just before the first char of `text`
    ///
    /// The index lands on the last char of the first prefix prepended, which
    /// is the opening quote once the span is decorated.
    pub fn before_start(text: &str) -> Self {
        Self {
            before_start: true,
            ..Self::new(text, 0)
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    /// Length of the current text in chars
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn truncated_at_start(&self) -> bool {
        self.truncated_at_start
    }

    pub fn truncated_at_end(&self) -> bool {
        self.truncated_at_end
    }

    /// Keep only `range` of the current text
    ///
    /// The range is clamped first; a range covering the whole text changes
    /// nothing.
    pub fn truncate(&mut self, range: Range<usize>) {
        let len = self.text.len();
        let end = range.end.min(len);
        let start = range.start.min(end);
        if start == 0 && end == len {
            return;
        }
        self.text = self.text[start..end].to_vec();
        self.index = self.index.saturating_sub(start).min(self.text.len());
        self.truncated_at_start |= start > 0;
        self.before_start &= start == 0;
        self.truncated_at_end |= end < len;
    }

    /// Replace `\n` and `\r` with their two-character escapes
    pub fn escape_new_lines(&mut self) {
        let mut escaped = Vec::with_capacity(self.text.len());
        let mut index = self.index;
        for (position, c) in self.text.iter().enumerate() {
            let replacement = match c {
                '\n' => Some('n'),
                '\r' => Some('r'),
                _ => None,
            };
            match replacement {
                Some(r) => {
                    escaped.push('\\');
                    escaped.push(r);
                    if position < self.index {
                        index += 1;
                    }
                }
                None => escaped.push(*c),
            }
        }
        self.text = escaped;
        self.index = index;
    }

    pub fn prepend(&mut self, prefix: &str) {
        let prefix: Vec<char> = prefix.chars().collect();
        if self.before_start && !prefix.is_empty() {
            self.index += prefix.len() - 1;
            self.before_start = false;
        } else {
            self.index += prefix.len();
        }
        self.text.splice(0..0, prefix);
    }

    pub fn append(&mut self, suffix: &str) {
        self.text.extend(suffix.chars());
    }
}
