use std::fmt;
use std::sync::Arc;

use super::{EquivalencyResult, EquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::Result;
use crate::value::{Type, Value};

/// Runs the steps registered through `EquivalencyOptions::using`
#[derive(Debug, Clone, Copy, Default)]
pub struct RunAllUserStepsEquivalencyStep;

impl EquivalencyStep for RunAllUserStepsEquivalencyStep {
    fn handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        for step in context.options().user_steps() {
            let result = step.handle(comparands, context, validator)?;
            if result != EquivalencyResult::ContinueWithNext {
                return Ok(result);
            }
        }
        Ok(EquivalencyResult::ContinueWithNext)
    }
}

impl fmt::Display for RunAllUserStepsEquivalencyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Run all user-supplied steps")
    }
}

type TypeAssertion = Arc<dyn Fn(&Value, &Value) -> std::result::Result<(), String> + Send + Sync>;

/// Judges nodes of one type with a user assertion
///
/// The assertion receives `(subject, expectation)`; an `Err` message is
/// reported at the node.
#[derive(Clone)]
pub struct TypeAssertionStep {
    ty: Type,
    description: String,
    assertion: TypeAssertion,
}

impl TypeAssertionStep {
    pub fn new<F>(ty: Type, description: impl Into<String>, assertion: F) -> Self
    where
        F: Fn(&Value, &Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        Self {
            ty,
            description: description.into(),
            assertion: Arc::new(assertion),
        }
    }
}

impl EquivalencyStep for TypeAssertionStep {
    fn handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        _validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        let expected = comparands.expected_type(context.options());
        if !expected.is_assignable_to(&self.ty) {
            return Ok(EquivalencyResult::ContinueWithNext);
        }
        if let Err(message) = (self.assertion)(&comparands.subject, &comparands.expectation) {
            context.fail(message);
        }
        Ok(EquivalencyResult::AssertionCompleted)
    }
}

impl fmt::Display for TypeAssertionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invoke {} for {}", self.description, self.ty)
    }
}
