//! Description of a compared position handed to user predicates

use super::comparands::Comparands;
use super::node::Node;
use crate::value::Type;

/// What ordering rules and conversion predicates get to see about a node
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Expectation path, e.g. `[2].Items.Name`
    pub path: String,
    pub ty: Type,
    pub parent_type: Option<Type>,
    pub compile_time_type: Type,
    pub runtime_type: Type,
}

impl ObjectInfo {
    pub fn new(node: &Node, comparands: &Comparands) -> Self {
        Self {
            path: node.expectation().path_and_name(),
            ty: node.ty().clone(),
            parent_type: node.parent_type().cloned(),
            compile_time_type: comparands.compile_time_type.clone(),
            runtime_type: comparands.runtime_type(),
        }
    }

    /// Info with only a path, all types `Any`
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ty: Type::Any,
            parent_type: None,
            compile_time_type: Type::Any,
            runtime_type: Type::Any,
        }
    }
}
