use std::fmt;

use affirm_core_types::schema::EVENT_CONVERSION_FAILED;

use super::{EquivalencyResult, EquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::conversion::convert;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::Result;

/// Converts the subject to the expectation's type when configured to
///
/// Never settles a node. A failed conversion leaves the subject as it was.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConversionStep;

impl EquivalencyStep for AutoConversionStep {
    fn handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        _validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        let selector = context.options().conversion_selector();
        if !selector.requires_conversion(comparands, context.node()) {
            return Ok(EquivalencyResult::ContinueWithNext);
        }
        if comparands.subject.is_null() || comparands.expectation.is_null() {
            return Ok(EquivalencyResult::ContinueWithNext);
        }
        let (Some(target), Some(source)) = (
            comparands.expectation.runtime_type(),
            comparands.subject.runtime_type(),
        ) else {
            return Ok(EquivalencyResult::ContinueWithNext);
        };
        if source.is_assignable_to(&target) {
            return Ok(EquivalencyResult::ContinueWithNext);
        }

        match convert(&comparands.subject, &target) {
            Ok(converted) => {
                context.trace(format!(
                    "Converted subject {} at {} to {}",
                    context.format(&comparands.subject),
                    context.node().description(),
                    target
                ));
                comparands.subject = converted;
            }
            Err(err) => {
                let path = context.node().description();
                tracing::debug!(
                    op = "auto_conversion",
                    event = EVENT_CONVERSION_FAILED,
                    path = %path,
                    subject_type = %source,
                    expectation_type = %target,
                    error = %err,
                );
                context.trace(format!(
                    "Failed to convert subject {} at {} to {}: {}",
                    context.format(&comparands.subject),
                    path,
                    target,
                    err
                ));
            }
        }
        Ok(EquivalencyResult::ContinueWithNext)
    }
}

impl fmt::Display for AutoConversionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Attempt to convert the subject to the expectation type")
    }
}
