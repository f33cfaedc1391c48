use std::fmt;
use std::rc::Rc;

use super::{report_mismatch, EquivalencyResult, EquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::Result;
use crate::value::Value;

/// Settles identical references and null on either side
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEqualityEquivalencyStep;

impl EquivalencyStep for ReferenceEqualityEquivalencyStep {
    fn handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        _validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        match (&comparands.subject, &comparands.expectation) {
            (Value::Null, Value::Null) => Ok(EquivalencyResult::EquivalencyProven),
            (Value::Object(a), Value::Object(b)) if Rc::ptr_eq(a, b) => {
                Ok(EquivalencyResult::EquivalencyProven)
            }
            (Value::Null, _) | (_, Value::Null) => {
                report_mismatch(comparands, context);
                Ok(EquivalencyResult::AssertionCompleted)
            }
            _ => Ok(EquivalencyResult::ContinueWithNext),
        }
    }
}

impl fmt::Display for ReferenceEqualityEquivalencyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Try reference equality")
    }
}
