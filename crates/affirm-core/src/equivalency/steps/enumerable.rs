use std::fmt;

use super::{EquivalencyResult, TypedEquivalencyStep};
use crate::equivalency::comparands::Comparands;
use crate::equivalency::context::ValidationContext;
use crate::equivalency::node::Node;
use crate::equivalency::validator::ValidateChildNode;
use crate::errors::Result;
use crate::execution::Failure;
use crate::value::{Type, Value};

/// Compares sequences item by item
///
/// With strict ordering items are paired by index. Otherwise every expected
/// item is matched against the subject items not matched yet, trying the
/// same index first.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerableEquivalencyStep;

impl TypedEquivalencyStep for EnumerableEquivalencyStep {
    fn accepts(&self, expected_type: &Type) -> bool {
        *expected_type == Type::Sequence
    }

    fn on_handle(
        &self,
        comparands: &mut Comparands,
        context: &mut ValidationContext<'_>,
        validator: &dyn ValidateChildNode,
    ) -> Result<EquivalencyResult> {
        let (Value::Seq(subject), Value::Seq(expectation)) =
            (&comparands.subject, &comparands.expectation)
        else {
            if comparands.expectation.is_null() {
                return Ok(EquivalencyResult::ContinueWithNext);
            }
            let message = format!(
                "Expected {} to be a collection, but found {}.",
                context.node().description(),
                context.format(&comparands.subject)
            );
            context.fail(message);
            return Ok(EquivalencyResult::AssertionCompleted);
        };

        if subject.len() != expectation.len() {
            let message = format!(
                "Expected {} to be a collection with {} item(s), but {} contains {} item(s).",
                context.node().description(),
                expectation.len(),
                context.format(&comparands.subject),
                subject.len()
            );
            context.fail(message);
            return Ok(EquivalencyResult::AssertionCompleted);
        }

        let strict = context
            .options()
            .is_strictly_ordered(comparands, context.node());
        context.trace(if strict {
            "Comparing items in strict order"
        } else {
            "Comparing items in any order"
        });

        if strict {
            for (index, (actual, expected)) in subject.iter().zip(expectation).enumerate() {
                compare_item(index, index, actual, expected, context, validator)?;
            }
        } else {
            match_loosely(subject, expectation, context, validator)?;
        }
        Ok(EquivalencyResult::AssertionCompleted)
    }
}

fn compare_item(
    expectation_index: usize,
    subject_index: usize,
    actual: &Value,
    expected: &Value,
    context: &mut ValidationContext<'_>,
    validator: &dyn ValidateChildNode,
) -> Result<()> {
    let node = Node::collection_item(context.node(), expectation_index, subject_index);
    let mut child = Comparands::new(actual.clone(), expected.clone(), Type::Any);
    let mut child_context = context.for_node(node);
    validator.assert_equality_using(&mut child, &mut child_context)
}

fn match_loosely(
    subject: &[Value],
    expectation: &[Value],
    context: &mut ValidationContext<'_>,
    validator: &dyn ValidateChildNode,
) -> Result<()> {
    let mut unmatched: Vec<usize> = (0..subject.len()).collect();

    for (index, expected) in expectation.iter().enumerate() {
        let mut candidates = unmatched.clone();
        if let Some(same) = candidates.iter().position(|&i| i == index) {
            candidates.remove(same);
            candidates.insert(0, index);
        }

        let mut closest: Option<Vec<Failure>> = None;
        let mut matched = None;
        for candidate in candidates {
            let ((), failures) = context.probe(|probe| {
                compare_item(index, candidate, &subject[candidate], expected, probe, validator)
            })?;
            if failures.is_empty() {
                matched = Some(candidate);
                break;
            }
            if closest.as_ref().map_or(true, |c| failures.len() < c.len()) {
                closest = Some(failures);
            }
        }

        match matched {
            Some(candidate) => unmatched.retain(|&i| i != candidate),
            None => {
                if let Some(failures) = closest {
                    context.scope().replay(failures);
                }
            }
        }
    }
    Ok(())
}

impl fmt::Display for EnumerableEquivalencyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compare collections item by item")
    }
}
