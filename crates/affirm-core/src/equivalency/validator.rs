//! Drives the step plan for each node
//!
//! The recursion is guarded twice: a depth limit and an explicit ancestor
//! stack of expectation objects. Both turn into reported failures.

use super::comparands::Comparands;
use super::context::ValidationContext;
use super::global::EquivalencyPlan;
use super::options::CyclicReferenceHandling;
use super::steps::EquivalencyResult;
use crate::errors::{AffirmError, Result};

/// Callback steps use to compare child nodes
pub trait ValidateChildNode {
    /// Compare `comparands` at `context.node()`, reporting into the shared scope
    ///
    /// # Errors
    ///
    /// Returns configuration errors; mismatches are reported, not returned.
    fn assert_equality_using(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
    ) -> Result<()>;
}

pub struct EquivalencyValidator<'p> {
    plan: &'p EquivalencyPlan,
}

impl<'p> EquivalencyValidator<'p> {
    pub fn new(plan: &'p EquivalencyPlan) -> Self {
        Self { plan }
    }

    fn run_steps(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
    ) -> Result<()> {
        for step in self.plan.steps() {
            let result = step.handle(comparands, context, self)?;
            if result != EquivalencyResult::ContinueWithNext {
                context.trace(format!("{} -> {}", step, result));
                return Ok(());
            }
        }
        Err(AffirmError::NoStepHandled {
            path: context.node().description(),
        })
    }
}

impl ValidateChildNode for EquivalencyValidator<'_> {
    fn assert_equality_using(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
    ) -> Result<()> {
        let options = context.options();
        let depth = context.node().depth();
        if !options.allows_infinite_recursion() && depth > options.max_recursion_depth() {
            let message = format!(
                "The maximum recursion depth of {} was reached at {}.",
                options.max_recursion_depth(),
                context.node().description()
            );
            context.fail(message);
            return Ok(());
        }

        context.trace(format!(
            "{} ({})",
            context.node().description(),
            comparands.expected_type(options)
        ));

        let Some(object) = comparands.expectation.as_object().cloned() else {
            return self.run_steps(comparands, context);
        };

        if context.state().is_ancestor(&object) {
            if options.cyclic_reference_handling() == CyclicReferenceHandling::Report {
                let message = format!(
                    "Expected {} to be {}, but it contains a cyclic reference.",
                    context.node().description(),
                    context.format(&comparands.expectation)
                );
                context.fail(message);
            } else {
                context.trace("cyclic reference ignored");
            }
            return Ok(());
        }

        context.state().push_ancestor(&object);
        let result = self.run_steps(comparands, context);
        context.state().pop_ancestor();
        result
    }
}
