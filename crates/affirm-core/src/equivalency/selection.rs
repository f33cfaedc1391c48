//! Member selection rules
//!
//! Decide which expectation members take part in a structural comparison.
//! Additive rules run first and their results are merged without duplicates;
//! filtering rules then run in registration order.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use super::member_path::MemberPath;
use super::node::Node;
use super::options::EquivalencyOptions;
use crate::value::{MemberDef, MemberKind, ObjectType};

/// What a selection rule may consult besides the node
pub struct MemberSelectionContext<'a> {
    /// Type whose members are being selected
    pub ty: &'a ObjectType,
    pub include_internal: bool,
    pub include_properties: bool,
    pub include_fields: bool,
}

pub trait MemberSelectionRule: fmt::Display + Send + Sync + 'static {
    /// Additive rules add members; the others only remove
    fn includes_members(&self) -> bool {
        false
    }

    fn select_members(
        &self,
        node: &Node,
        selected: Vec<MemberDef>,
        context: &MemberSelectionContext<'_>,
    ) -> Vec<MemberDef>;

    fn rule_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

/// Run the configured rules for the object at `node`
pub(crate) fn select_members(
    node: &Node,
    ty: &ObjectType,
    options: &EquivalencyOptions,
) -> Vec<MemberDef> {
    let context = MemberSelectionContext {
        ty,
        include_internal: options.includes_internal_members(),
        include_properties: options.includes_properties(),
        include_fields: options.includes_fields(),
    };
    let rules = options.selection_rules();

    let mut members: Vec<MemberDef> = Vec::new();
    for rule in rules.iter().filter(|r| r.includes_members()) {
        for candidate in rule.select_members(node, members.clone(), &context) {
            if !members.iter().any(|m| m.is_same_member(&candidate)) {
                members.push(candidate);
            }
        }
    }
    for rule in rules.iter().filter(|r| !r.includes_members()) {
        members = rule.select_members(node, members, &context);
    }
    members
}

fn visible_members<'a>(
    context: &'a MemberSelectionContext<'_>,
    kind: MemberKind,
) -> impl Iterator<Item = &'a MemberDef> + 'a {
    let include_internal = context.include_internal;
    context.ty.members().iter().filter(move |m| {
        m.kind() == kind && !m.is_indexer() && m.visibility().is_visible(include_internal)
    })
}

/// Every visible, non-indexer property
#[derive(Debug, Default, Clone, Copy)]
pub struct AllPropertiesSelectionRule;

impl MemberSelectionRule for AllPropertiesSelectionRule {
    fn includes_members(&self) -> bool {
        true
    }

    fn select_members(
        &self,
        _node: &Node,
        mut selected: Vec<MemberDef>,
        context: &MemberSelectionContext<'_>,
    ) -> Vec<MemberDef> {
        if context.include_properties {
            selected.extend(visible_members(context, MemberKind::Property).cloned());
        }
        selected
    }
}

impl fmt::Display for AllPropertiesSelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Include all non-private properties")
    }
}

/// Every visible field
#[derive(Debug, Default, Clone, Copy)]
pub struct AllFieldsSelectionRule;

impl MemberSelectionRule for AllFieldsSelectionRule {
    fn includes_members(&self) -> bool {
        true
    }

    fn select_members(
        &self,
        _node: &Node,
        mut selected: Vec<MemberDef>,
        context: &MemberSelectionContext<'_>,
    ) -> Vec<MemberDef> {
        if context.include_fields {
            selected.extend(visible_members(context, MemberKind::Field).cloned());
        }
        selected
    }
}

impl fmt::Display for AllFieldsSelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Include all non-private fields")
    }
}

/// Members on the way to, at, or below a configured path
#[derive(Debug, Clone)]
pub struct IncludeMemberByPathSelectionRule {
    path: MemberPath,
}

impl IncludeMemberByPathSelectionRule {
    pub fn new(path: MemberPath) -> Self {
        Self { path }
    }
}

impl MemberSelectionRule for IncludeMemberByPathSelectionRule {
    fn includes_members(&self) -> bool {
        true
    }

    fn select_members(
        &self,
        node: &Node,
        mut selected: Vec<MemberDef>,
        context: &MemberSelectionContext<'_>,
    ) -> Vec<MemberDef> {
        let include_internal = context.include_internal;
        for member in context
            .ty
            .members()
            .iter()
            .filter(|m| !m.is_indexer() && m.visibility().is_visible(include_internal))
        {
            let candidate = self.path.align(
                &MemberPath::of_member(node, member.name()),
                node.root_is_collection(),
            );
            if self.path.is_same_as(&candidate)
                || self.path.is_child_of(&candidate)
                || self.path.is_parent_of(&candidate)
            {
                selected.push(member.clone());
            }
        }
        selected
    }
}

impl fmt::Display for IncludeMemberByPathSelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Include member root.{}", self.path)
    }
}

/// Drops the member at a configured path, and with it everything below
#[derive(Debug, Clone)]
pub struct ExcludeMemberByPathSelectionRule {
    path: MemberPath,
}

impl ExcludeMemberByPathSelectionRule {
    pub fn new(path: MemberPath) -> Self {
        Self { path }
    }
}

impl MemberSelectionRule for ExcludeMemberByPathSelectionRule {
    fn select_members(
        &self,
        node: &Node,
        selected: Vec<MemberDef>,
        _context: &MemberSelectionContext<'_>,
    ) -> Vec<MemberDef> {
        selected
            .into_iter()
            .filter(|member| {
                let candidate = self.path.align(
                    &MemberPath::of_member(node, member.name()),
                    node.root_is_collection(),
                );
                !self.path.is_same_as(&candidate)
            })
            .collect()
    }
}

impl fmt::Display for ExcludeMemberByPathSelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exclude member root.{}", self.path)
    }
}

/// Predicate over a member definition and its expectation path
pub type MemberPredicate = Arc<dyn Fn(&MemberDef, &str) -> bool + Send + Sync>;

/// Drops members for which a predicate holds
#[derive(Clone)]
pub struct ExcludeMemberByPredicateSelectionRule {
    description: String,
    predicate: MemberPredicate,
}

impl ExcludeMemberByPredicateSelectionRule {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&MemberDef, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }
}

impl MemberSelectionRule for ExcludeMemberByPredicateSelectionRule {
    fn select_members(
        &self,
        node: &Node,
        selected: Vec<MemberDef>,
        _context: &MemberSelectionContext<'_>,
    ) -> Vec<MemberDef> {
        selected
            .into_iter()
            .filter(|member| {
                let path = MemberPath::of_member(node, member.name()).to_string();
                !(self.predicate)(member, &path)
            })
            .collect()
    }
}

impl fmt::Display for ExcludeMemberByPredicateSelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exclude members where {}", self.description)
    }
}

/// Drops members marked non-browsable on the expectation
#[derive(Debug, Default, Clone, Copy)]
pub struct ExcludeNonBrowsableMembersRule;

impl MemberSelectionRule for ExcludeNonBrowsableMembersRule {
    fn select_members(
        &self,
        _node: &Node,
        selected: Vec<MemberDef>,
        _context: &MemberSelectionContext<'_>,
    ) -> Vec<MemberDef> {
        selected.into_iter().filter(|m| m.is_browsable()).collect()
    }
}

impl fmt::Display for ExcludeNonBrowsableMembersRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Exclude non-browsable members")
    }
}
