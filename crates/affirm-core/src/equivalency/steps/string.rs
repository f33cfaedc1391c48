use std::fmt;

use super::{report_mismatch, EquivalencyResult, TypedEquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::Result;
use crate::mismatch::assertions::first_mismatch_index_by;
use crate::mismatch::{render_mismatch, RenderOptions, StandardTruncationStrategy};
use crate::value::{Type, Value};

/// Compares strings, rendering an excerpt around the first difference
#[derive(Debug, Clone, Copy, Default)]
pub struct StringEqualityEquivalencyStep;

impl TypedEquivalencyStep for StringEqualityEquivalencyStep {
    fn accepts(&self, expected_type: &Type) -> bool {
        *expected_type == Type::String
    }

    fn on_handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        _validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        let (Value::Str(subject), Value::Str(expectation)) =
            (&comparands.subject, &comparands.expectation)
        else {
            if comparands.expectation.as_str().is_some() && !comparands.subject.is_null() {
                report_mismatch(comparands, context);
                return Ok(EquivalencyResult::AssertionCompleted);
            }
            return Ok(EquivalencyResult::ContinueWithNext);
        };

        let comparison = context.options().string_comparison();
        let subject = comparison.normalize(subject);
        let expectation = comparison.normalize(expectation);

        let subject_len = subject.chars().count();
        let expectation_len = expectation.chars().count();
        let index = first_mismatch_index_by(&subject, &expectation, |a, b| {
            comparison.chars_match(a, b)
        });
        if index == subject_len && index == expectation_len {
            return Ok(EquivalencyResult::EquivalencyProven);
        }

        let description = format!(
            "Expected {} to be the same string",
            context.node().description()
        );
        let length = context.formatting().string_printing_length;
        let options = RenderOptions::new(description)
            .with_truncation(StandardTruncationStrategy::new(length));
        let message = render_mismatch(&subject, &expectation, index, index, &options);
        context.fail(message);
        Ok(EquivalencyResult::AssertionCompleted)
    }
}

impl fmt::Display for StringEqualityEquivalencyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compare strings")
    }
}
