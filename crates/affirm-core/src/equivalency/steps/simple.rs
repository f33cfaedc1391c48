use std::fmt;

use super::{report_mismatch, EquivalencyResult, EquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::Result;

/// Terminal step: plain equality for whatever is left
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEqualityEquivalencyStep;

impl EquivalencyStep for SimpleEqualityEquivalencyStep {
    fn handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        _validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        if comparands.subject.simple_equals(&comparands.expectation) {
            return Ok(EquivalencyResult::EquivalencyProven);
        }
        report_mismatch(comparands, context);
        Ok(EquivalencyResult::AssertionCompleted)
    }
}

impl fmt::Display for SimpleEqualityEquivalencyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compare with simple equality")
    }
}
