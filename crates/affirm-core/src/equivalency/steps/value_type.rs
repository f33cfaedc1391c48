use std::fmt;

use super::{report_mismatch, EquivalencyResult, EquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::Result;

/// Compares values with their own equality instead of member by member
///
/// Applies to primitives, object types that define an equality, and types
/// registered with `comparing_by_value`, unless a type is registered with
/// `comparing_by_members`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueTypeEquivalencyStep;

impl EquivalencyStep for ValueTypeEquivalencyStep {
    fn handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        _validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        let expected = comparands.expected_type(context.options());
        if !context.options().is_compared_by_value(&expected) {
            return Ok(EquivalencyResult::ContinueWithNext);
        }
        context.trace(format!("Treating {} as a value type", expected));
        if comparands.subject.simple_equals(&comparands.expectation) {
            return Ok(EquivalencyResult::EquivalencyProven);
        }
        report_mismatch(comparands, context);
        Ok(EquivalencyResult::AssertionCompleted)
    }
}

impl fmt::Display for ValueTypeEquivalencyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compare value types with their own equality")
    }
}
