//! Per-node validation context and the traversal state shared by all nodes

use std::rc::Rc;

use super::node::Node;
use super::options::EquivalencyOptions;
use crate::errors::Result;
use crate::execution::{AssertionScope, Failure, Tracer};
use crate::formatting::{self, FormattingOptions};
use crate::value::{Object, Value};

/// Mutable state of one comparison
///
/// The ancestor stack holds the identities of the expectation objects on the
/// path from the root to the current node; revisiting one is a cycle.
#[derive(Debug)]
pub struct TraversalState {
    scope: AssertionScope,
    tracer: Tracer,
    formatting: FormattingOptions,
    ancestors: Vec<*const Object>,
}

impl TraversalState {
    pub fn new(tracing: bool, formatting: FormattingOptions) -> Self {
        Self {
            scope: AssertionScope::new(),
            tracer: Tracer::new(tracing),
            formatting,
            ancestors: Vec::new(),
        }
    }

    pub fn into_parts(self) -> (AssertionScope, Tracer) {
        (self.scope, self.tracer)
    }

    pub(crate) fn is_ancestor(&self, object: &Rc<Object>) -> bool {
        self.ancestors.contains(&Rc::as_ptr(object))
    }

    pub(crate) fn push_ancestor(&mut self, object: &Rc<Object>) {
        self.ancestors.push(Rc::as_ptr(object));
    }

    pub(crate) fn pop_ancestor(&mut self) {
        self.ancestors.pop();
    }
}

/// Everything a step needs to judge one node
pub struct ValidationContext<'a> {
    node: Node,
    options: &'a EquivalencyOptions,
    state: &'a mut TraversalState,
}

impl<'a> ValidationContext<'a> {
    pub fn new(node: Node, options: &'a EquivalencyOptions, state: &'a mut TraversalState) -> Self {
        Self {
            node,
            options,
            state,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn options(&self) -> &'a EquivalencyOptions {
        self.options
    }

    pub fn scope(&mut self) -> &mut AssertionScope {
        &mut self.state.scope
    }

    pub fn tracer(&mut self) -> &mut Tracer {
        &mut self.state.tracer
    }

    pub(crate) fn state(&mut self) -> &mut TraversalState {
        self.state
    }

    /// Report a failure at the current node
    pub fn fail(&mut self, message: impl Into<String>) {
        let path = self.node.description();
        self.state.scope.fail_with(path, message);
    }

    /// Trace a line at the current node's depth
    pub fn trace(&mut self, message: impl AsRef<str>) {
        let depth = self.node.depth();
        self.state.tracer.write_line(depth, message);
    }

    pub fn formatting(&self) -> &FormattingOptions {
        &self.state.formatting
    }

    pub fn format(&self, value: &Value) -> String {
        formatting::format_value(value, &self.state.formatting)
    }

    /// Context for a child node sharing this traversal
    pub fn for_node(&mut self, node: Node) -> ValidationContext<'_> {
        ValidationContext {
            node,
            options: self.options,
            state: &mut *self.state,
        }
    }

    /// Run `f` against a fresh scope and hand back what it reported
    ///
    /// Used to test a candidate match without reporting its failures.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors raised by `f`.
    pub fn probe<T>(
        &mut self,
        f: impl FnOnce(&mut ValidationContext<'_>) -> Result<T>,
    ) -> Result<(T, Vec<Failure>)> {
        let outer = std::mem::take(&mut self.state.scope);
        let result = f(self);
        let inner = std::mem::replace(&mut self.state.scope, outer);
        Ok((result?, inner.into_failures()))
    }
}
