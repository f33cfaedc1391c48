//! The engine's view of a member: one node, two definitions

use super::node::Node;
use crate::value::{MemberDef, MemberKind, Value};

/// A selected expectation member and the subject member it was matched to
///
/// Until a matching rule runs, both sides refer to the expectation's
/// definition.
#[derive(Debug, Clone)]
pub struct Member {
    node: Node,
    expectation: MemberDef,
    subject: MemberDef,
}

impl Member {
    pub fn new(node: Node, expectation: MemberDef) -> Self {
        Self {
            node,
            subject: expectation.clone(),
            expectation,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }

    pub fn name(&self) -> &str {
        self.expectation.name()
    }

    pub fn kind(&self) -> MemberKind {
        self.expectation.kind()
    }

    pub fn expectation_def(&self) -> &MemberDef {
        &self.expectation
    }

    pub fn subject_def(&self) -> &MemberDef {
        &self.subject
    }

    /// Pair with `subject`, renaming the subject pathway if the names differ
    pub fn with_subject(mut self, subject: &MemberDef) -> Self {
        if subject.name() != self.expectation.name() {
            self.node.adjust_for_remapped_subject(subject.name());
        }
        self.subject = subject.clone();
        self
    }

    pub fn read_expectation(&self, parent: &Value) -> Value {
        parent
            .as_object()
            .map_or(Value::Null, |o| o.read(&self.expectation))
    }

    pub fn read_subject(&self, parent: &Value) -> Value {
        parent
            .as_object()
            .map_or(Value::Null, |o| o.read(&self.subject))
    }
}
