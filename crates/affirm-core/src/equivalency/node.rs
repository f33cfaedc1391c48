//! Graph positions
//!
//! A node identifies one position in the compared graphs. It carries two
//! pathways because a mapped member may have a different name on the subject;
//! the expectation pathway always reflects the expectation's shape.

use crate::value::{MemberDef, MemberKind, Type};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    CollectionItem(usize),
    DictionaryEntry(String),
    Member(MemberKind),
}

/// A parent path plus the name of the position within it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pathway {
    path: String,
    name: String,
}

impl Pathway {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `a.b` for members, `a[2]` / `a[key]` for items and entries
    pub fn path_and_name(&self) -> String {
        if self.path.is_empty() {
            self.name.clone()
        } else if self.name.is_empty() {
            self.path.clone()
        } else if self.name.starts_with('[') {
            format!("{}{}", self.path, self.name)
        } else {
            format!("{}.{}", self.path, self.name)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    ty: Type,
    parent_type: Option<Type>,
    subject: Pathway,
    expectation: Pathway,
    depth: usize,
    root_is_collection: bool,
}

impl Node {
    pub fn root(ty: Type, root_is_collection: bool) -> Self {
        Self {
            kind: NodeKind::Root,
            ty,
            parent_type: None,
            subject: Pathway::default(),
            expectation: Pathway::default(),
            depth: 0,
            root_is_collection,
        }
    }

    /// Child node for a member of an object whose members were selected from
    /// `parent_type`
    pub fn member(parent: &Node, parent_type: Type, def: &MemberDef) -> Self {
        Self {
            kind: NodeKind::Member(def.kind()),
            ty: def.declared_type().clone(),
            parent_type: Some(parent_type),
            subject: Pathway::new(parent.subject.path_and_name(), def.name()),
            expectation: Pathway::new(parent.expectation.path_and_name(), def.name()),
            depth: parent.depth + 1,
            root_is_collection: parent.root_is_collection,
        }
    }

    /// Child node pairing an expectation item with a subject item
    pub fn collection_item(parent: &Node, expectation_index: usize, subject_index: usize) -> Self {
        Self {
            kind: NodeKind::CollectionItem(expectation_index),
            ty: Type::Any,
            parent_type: Some(Type::Sequence),
            subject: Pathway::new(
                parent.subject.path_and_name(),
                format!("[{}]", subject_index),
            ),
            expectation: Pathway::new(
                parent.expectation.path_and_name(),
                format!("[{}]", expectation_index),
            ),
            depth: parent.depth + 1,
            root_is_collection: parent.root_is_collection,
        }
    }

    pub fn dictionary_entry(parent: &Node, key: &str) -> Self {
        let name = format!("[{}]", key);
        Self {
            kind: NodeKind::DictionaryEntry(key.to_string()),
            ty: Type::Any,
            parent_type: Some(Type::Map),
            subject: Pathway::new(parent.subject.path_and_name(), name.clone()),
            expectation: Pathway::new(parent.expectation.path_and_name(), name),
            depth: parent.depth + 1,
            root_is_collection: parent.root_is_collection,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Declared type of the position
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn parent_type(&self) -> Option<&Type> {
        self.parent_type.as_ref()
    }

    pub fn subject(&self) -> &Pathway {
        &self.subject
    }

    pub fn expectation(&self) -> &Pathway {
        &self.expectation
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }

    pub fn root_is_collection(&self) -> bool {
        self.root_is_collection
    }

    /// Rename the subject side after a mapping matched a differently named member
    pub fn adjust_for_remapped_subject(&mut self, subject_name: &str) {
        self.subject.name = subject_name.to_string();
    }

    /// How failures refer to this node
    pub fn description(&self) -> String {
        if self.is_root() {
            "subject".to_string()
        } else {
            self.expectation.path_and_name()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ObjectType;

    fn order_type() -> std::sync::Arc<ObjectType> {
        ObjectType::builder("Order")
            .property("Lines", Type::Sequence)
            .field("total", Type::Float)
            .build()
    }

    #[test]
    fn test_paths_compose() {
        let ty = order_type();
        let root = Node::root(Type::Object(ty.clone()), false);
        let lines = Node::member(&root, Type::Object(ty.clone()), &ty.members()[0]);
        let item = Node::collection_item(&lines, 2, 2);
        let entry = Node::dictionary_entry(&item, "sku");

        assert_eq!(root.description(), "subject");
        assert_eq!(lines.description(), "Lines");
        assert_eq!(item.description(), "Lines[2]");
        assert_eq!(entry.description(), "Lines[2][sku]");
        assert_eq!(entry.depth(), 3);
        assert_eq!(lines.kind(), &NodeKind::Member(MemberKind::Property));
    }

    #[test]
    fn test_child_depth_is_parent_plus_one() {
        let ty = order_type();
        let root = Node::root(Type::Object(ty.clone()), false);
        let mut node = root.clone();
        for expected_depth in 1..5 {
            node = Node::member(&node, Type::Object(ty.clone()), &ty.members()[1]);
            assert_eq!(node.depth(), expected_depth);
        }
    }

    #[test]
    fn test_remapping_only_touches_subject_side() {
        let ty = order_type();
        let root = Node::root(Type::Object(ty.clone()), true);
        let item = Node::collection_item(&root, 0, 3);
        let mut member = Node::member(&item, Type::Object(ty.clone()), &ty.members()[1]);
        member.adjust_for_remapped_subject("sum");

        assert_eq!(member.expectation().path_and_name(), "[0].total");
        assert_eq!(member.subject().path_and_name(), "[3].sum");
        assert!(member.root_is_collection());
    }
}
