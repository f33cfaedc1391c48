//! Member paths such as `Orders[2].Lines[].Sku`
//!
//! A path is a list of segments: member names and index qualifiers. In a
//! configured path the empty qualifier `[]` matches any index.

use std::fmt;

use super::node::Node;
use crate::errors::{AffirmError, Result};

const WILDCARD: &str = "[]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPath {
    segments: Vec<String>,
}

impl MemberPath {
    /// Parse a configured path
    ///
    /// # Errors
    ///
    /// Returns `EmptyArgument` for an empty path and `InvalidMemberPath` for
    /// empty segments, unbalanced brackets or non-numeric qualifiers.
    pub fn parse(path: &str) -> Result<Self> {
        if path.trim().is_empty() {
            return Err(AffirmError::EmptyArgument {
                argument: "path".to_string(),
            });
        }
        let invalid = |reason: &str| AffirmError::InvalidMemberPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        for (position, part) in path.split('.').enumerate() {
            if part.is_empty() {
                return Err(invalid("empty segment"));
            }
            let mut rest = part;
            match rest.find('[') {
                Some(0) if position > 0 => return Err(invalid("index without a member name")),
                Some(0) => {}
                Some(open) => {
                    segments.push(rest[..open].to_string());
                    rest = &rest[open..];
                }
                None => {
                    if part.contains(']') {
                        return Err(invalid("unbalanced brackets"));
                    }
                    segments.push(part.to_string());
                    continue;
                }
            }
            while !rest.is_empty() {
                if !rest.starts_with('[') {
                    return Err(invalid("text after an index qualifier"));
                }
                let close = rest.find(']').ok_or_else(|| invalid("unbalanced brackets"))?;
                let index = &rest[1..close];
                if !index.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid("index qualifiers must be numeric or empty"));
                }
                segments.push(rest[..=close].to_string());
                rest = &rest[close + 1..];
            }
        }
        Ok(Self { segments })
    }

    /// Path of the member called `name` below `parent`, as the engine sees it
    pub fn of_member(parent: &Node, name: &str) -> Self {
        let mut path = Self::from_trusted(&parent.expectation().path_and_name());
        path.segments.push(name.to_string());
        path
    }

    /// Split an engine-generated path without validation
    pub(crate) fn from_trusted(path: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut in_brackets = false;
        for c in path.chars() {
            match c {
                '[' if !in_brackets => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                    in_brackets = true;
                    current.push(c);
                }
                ']' if in_brackets => {
                    current.push(c);
                    segments.push(std::mem::take(&mut current));
                    in_brackets = false;
                }
                '.' if !in_brackets => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn starts_with_index(&self) -> bool {
        self.segments.first().is_some_and(|s| is_index(s))
    }

    pub fn has_index_qualifiers(&self) -> bool {
        self.segments.iter().any(|s| is_index(s))
    }

    pub fn without_leading_index(&self) -> Self {
        let skip = usize::from(self.starts_with_index());
        Self {
            segments: self.segments[skip..].to_vec(),
        }
    }

    /// Last segment and the path leading to it
    pub fn split_last(&self) -> Option<(&str, MemberPath)> {
        self.segments.split_last().map(|(last, parent)| {
            (
                last.as_str(),
                MemberPath {
                    segments: parent.to_vec(),
                },
            )
        })
    }

    /// Candidate path adjusted the way this configured path expects
    ///
    /// When the root is a collection, candidates start with `[n]`; a
    /// configured path that does not start with an index applies to every item.
    pub fn align(&self, candidate: &MemberPath, root_is_collection: bool) -> MemberPath {
        if root_is_collection && !self.starts_with_index() {
            candidate.without_leading_index()
        } else {
            candidate.clone()
        }
    }

    pub fn is_same_as(&self, candidate: &MemberPath) -> bool {
        self.segments.len() == candidate.segments.len() && self.prefix_matches(candidate)
    }

    /// This path is a proper ancestor of `candidate`
    pub fn is_parent_of(&self, candidate: &MemberPath) -> bool {
        self.segments.len() < candidate.segments.len() && self.prefix_matches(candidate)
    }

    /// `candidate` is a proper ancestor of this path
    pub fn is_child_of(&self, candidate: &MemberPath) -> bool {
        candidate.segments.len() < self.segments.len()
            && candidate
                .segments
                .iter()
                .zip(&self.segments)
                .all(|(actual, configured)| segment_matches(configured, actual))
    }

    fn prefix_matches(&self, candidate: &MemberPath) -> bool {
        self.segments
            .iter()
            .zip(&candidate.segments)
            .all(|(configured, actual)| segment_matches(configured, actual))
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && !is_index(segment) {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

fn is_index(segment: &str) -> bool {
    segment.starts_with('[')
}

fn segment_matches(configured: &str, actual: &str) -> bool {
    configured == actual || (configured == WILDCARD && is_index(actual))
}
