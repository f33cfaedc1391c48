//! Member matching rules
//!
//! For each selected expectation member, find the subject member it is
//! compared with. Rules run in configured order and the first match wins;
//! mapping rules are prepended so they run before matching by name.

use std::any::TypeId;
use std::fmt;

use super::member::Member;
use super::member_path::MemberPath;
use super::node::Node;
use super::options::EquivalencyOptions;
use crate::errors::{AffirmError, Result};
use crate::execution::AssertionScope;
use crate::value::{MemberDef, Type, Value};

pub trait MemberMatchingRule: fmt::Display + Send + Sync + 'static {
    /// Find the subject counterpart of `expected`
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the rule applies but its target
    /// does not exist.
    fn match_member(
        &self,
        expected: &Member,
        subject: &Value,
        parent: &Node,
        options: &EquivalencyOptions,
        scope: &mut AssertionScope,
    ) -> Result<Option<Member>>;

    fn rule_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

/// Run the configured matching rules; the first `Some` wins
pub(crate) fn find_match(
    expected: &Member,
    subject: &Value,
    parent: &Node,
    options: &EquivalencyOptions,
    scope: &mut AssertionScope,
) -> Result<Option<Member>> {
    for rule in options.matching_rules() {
        if let Some(matched) = rule.match_member(expected, subject, parent, options, scope)? {
            return Ok(Some(matched));
        }
    }
    Ok(None)
}

fn lookup_by_name(subject: &Value, name: &str, options: &EquivalencyOptions) -> Option<MemberDef> {
    subject.as_object().and_then(|o| {
        o.object_type()
            .find_property_or_field(name, options.includes_internal_members())
            .cloned()
    })
}

fn subject_type_name(subject: &Value) -> String {
    subject
        .runtime_type()
        .map_or_else(|| "<null>".to_string(), |t| t.name().to_string())
}

/// Same-named property, then field; reports when there is none
#[derive(Debug, Default, Clone, Copy)]
pub struct MustMatchByNameRule;

impl MemberMatchingRule for MustMatchByNameRule {
    fn match_member(
        &self,
        expected: &Member,
        subject: &Value,
        _parent: &Node,
        options: &EquivalencyOptions,
        scope: &mut AssertionScope,
    ) -> Result<Option<Member>> {
        let path = expected.node().description();
        match lookup_by_name(subject, expected.name(), options) {
            None => {
                scope.fail_with(
                    path.clone(),
                    format!(
                        "Expectation has {} {} that the other object does not have.",
                        expected.kind(),
                        path
                    ),
                );
                Ok(None)
            }
            Some(def) if !def.is_browsable() && options.ignores_non_browsable_on_subject() => {
                scope.fail_with(
                    path.clone(),
                    format!(
                        "Expectation has {} {} that is non-browsable in the other object, and non-browsable members on the subject are ignored with the current configuration",
                        expected.kind(),
                        path
                    ),
                );
                Ok(None)
            }
            Some(def) => Ok(Some(expected.clone().with_subject(&def))),
        }
    }
}

impl fmt::Display for MustMatchByNameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Match member by name (or report a failure)")
    }
}

/// Same-named property, then field; silently skips members the subject lacks
#[derive(Debug, Default, Clone, Copy)]
pub struct TryMatchByNameRule;

impl MemberMatchingRule for TryMatchByNameRule {
    fn match_member(
        &self,
        expected: &Member,
        subject: &Value,
        _parent: &Node,
        options: &EquivalencyOptions,
        _scope: &mut AssertionScope,
    ) -> Result<Option<Member>> {
        Ok(lookup_by_name(subject, expected.name(), options)
            .filter(|def| def.is_browsable() || !options.ignores_non_browsable_on_subject())
            .map(|def| expected.clone().with_subject(&def)))
    }
}

impl fmt::Display for TryMatchByNameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Try to match member by name")
    }
}

fn validate_member_name(name: &str, side: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AffirmError::EmptyArgument {
            argument: format!("{}_member_name", side),
        });
    }
    if name.contains(|c: char| matches!(c, '.' | '[' | ']')) {
        return Err(AffirmError::NestedMemberName {
            side: side.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Maps a member of one type to a differently named member of another
#[derive(Debug, Clone)]
pub struct MappedMemberMatchingRule {
    expectation_type: Type,
    subject_type: Type,
    expectation_member: String,
    subject_member: String,
}

impl MappedMemberMatchingRule {
    /// # Errors
    ///
    /// Returns `EmptyArgument` for an empty name and `NestedMemberName` for a
    /// name containing `.`, `[` or `]`.
    pub fn new(
        expectation_type: Type,
        subject_type: Type,
        expectation_member: impl Into<String>,
        subject_member: impl Into<String>,
    ) -> Result<Self> {
        let expectation_member = expectation_member.into();
        let subject_member = subject_member.into();
        validate_member_name(&expectation_member, "expectation")?;
        validate_member_name(&subject_member, "subject")?;
        Ok(Self {
            expectation_type,
            subject_type,
            expectation_member,
            subject_member,
        })
    }
}

impl MemberMatchingRule for MappedMemberMatchingRule {
    fn match_member(
        &self,
        expected: &Member,
        subject: &Value,
        parent: &Node,
        options: &EquivalencyOptions,
        _scope: &mut AssertionScope,
    ) -> Result<Option<Member>> {
        let parent_type = expected.node().parent_type().unwrap_or(parent.ty());
        let subject_matches = subject
            .runtime_type()
            .is_some_and(|t| t.is_assignable_to(&self.subject_type));
        if !parent_type.is_assignable_to(&self.expectation_type)
            || !subject_matches
            || expected.name() != self.expectation_member
        {
            return Ok(None);
        }
        match lookup_by_name(subject, &self.subject_member, options) {
            Some(def) => Ok(Some(expected.clone().with_subject(&def))),
            None => Err(AffirmError::MissingMappedMember {
                type_name: subject_type_name(subject),
                member: self.subject_member.clone(),
            }),
        }
    }
}

impl fmt::Display for MappedMemberMatchingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Map {}.{} to {}.{}",
            self.expectation_type, self.expectation_member, self.subject_type, self.subject_member
        )
    }
}

/// Maps an expectation member path to a sibling member on the subject
#[derive(Debug, Clone)]
pub struct MappedPathMatchingRule {
    expectation_path: MemberPath,
    subject_member: String,
    subject_path: MemberPath,
}

impl MappedPathMatchingRule {
    /// # Errors
    ///
    /// Returns a path parse error, `InvalidMemberPath` when a path ends in an
    /// index, or `MismatchedMappingParents` when the paths have different
    /// parents.
    pub fn new(expectation_path: &str, subject_path: &str) -> Result<Self> {
        let expectation = MemberPath::parse(expectation_path)?;
        let subject = MemberPath::parse(subject_path)?;
        let (Some((expectation_name, expectation_parent)), Some((subject_name, subject_parent))) =
            (expectation.split_last(), subject.split_last())
        else {
            return Err(AffirmError::EmptyArgument {
                argument: "path".to_string(),
            });
        };
        for (name, path) in [(expectation_name, expectation_path), (subject_name, subject_path)] {
            if name.starts_with('[') {
                return Err(AffirmError::InvalidMemberPath {
                    path: path.to_string(),
                    reason: "a mapping must end in a member name".to_string(),
                });
            }
        }
        if expectation_parent != subject_parent {
            return Err(AffirmError::MismatchedMappingParents {
                expectation_path: expectation_path.to_string(),
                subject_path: subject_path.to_string(),
            });
        }
        Ok(Self {
            subject_member: subject_name.to_string(),
            expectation_path: expectation,
            subject_path: subject,
        })
    }
}

impl MemberMatchingRule for MappedPathMatchingRule {
    fn match_member(
        &self,
        expected: &Member,
        subject: &Value,
        _parent: &Node,
        options: &EquivalencyOptions,
        _scope: &mut AssertionScope,
    ) -> Result<Option<Member>> {
        let node = expected.node();
        let candidate = self.expectation_path.align(
            &MemberPath::from_trusted(&node.expectation().path_and_name()),
            node.root_is_collection(),
        );
        if !self.expectation_path.is_same_as(&candidate) {
            return Ok(None);
        }
        match lookup_by_name(subject, &self.subject_member, options) {
            Some(def) => Ok(Some(expected.clone().with_subject(&def))),
            None => Err(AffirmError::MissingMappedMember {
                type_name: subject_type_name(subject),
                member: self.subject_member.clone(),
            }),
        }
    }
}

impl fmt::Display for MappedPathMatchingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Map {} to {}",
            self.expectation_path, self.subject_path
        )
    }
}
